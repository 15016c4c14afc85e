use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use shmframe_frame::{dump_pixels, FrameBuffer, DUMP_PIXEL_COUNT};
use shmframe_session::{ProcessingStats, Publication, Reception, TransferMeasurement};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One side's view of a frame copy.
#[derive(Debug, Serialize)]
pub struct TransferReport {
    pub event: &'static str,
    pub segment: String,
    pub sequence: u64,
    pub bytes: usize,
    pub transfer_ms: f64,
    pub transfer_fps: f64,
}

impl TransferReport {
    fn new(
        event: &'static str,
        segment: String,
        sequence: u64,
        bytes: usize,
        measurement: TransferMeasurement,
    ) -> Self {
        Self {
            event,
            segment,
            sequence,
            bytes,
            transfer_ms: measurement.elapsed_ms(),
            transfer_fps: measurement.fps(),
        }
    }

    pub fn published(publication: &Publication) -> Self {
        Self::new(
            "published",
            publication.segment().name().to_string(),
            publication.sequence(),
            publication.segment().capacity(),
            publication.measurement(),
        )
    }

    pub fn received(reception: &Reception) -> Self {
        Self::new(
            "received",
            reception.segment().name().to_string(),
            reception.sequence(),
            reception.frame().len(),
            reception.measurement(),
        )
    }
}

#[derive(Debug, Serialize)]
struct ProcessingOutput {
    event: &'static str,
    passes: usize,
    pass_ms: Vec<f64>,
    total_ms: f64,
    average_fps: f64,
}

#[derive(Debug, Serialize)]
struct PixelRow {
    index: usize,
    r: u8,
    g: u8,
    b: u8,
    a: u8,
    hex: String,
}

#[derive(Debug, Serialize)]
struct PixelOutput<'a> {
    event: &'static str,
    label: &'a str,
    pixels: Vec<PixelRow>,
}

pub fn print_transfer(report: &TransferReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            let mut table = new_table(vec![
                "EVENT",
                "SEGMENT",
                "SEQUENCE",
                "BYTES",
                "TRANSFER MS",
                "TRANSFER FPS",
            ]);
            table.add_row(vec![
                report.event.to_string(),
                report.segment.clone(),
                report.sequence.to_string(),
                report.bytes.to_string(),
                format!("{:.3}", report.transfer_ms),
                format!("{:.1}", report.transfer_fps),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            if report.event == "published" {
                println!(
                    "Image data sent to shared memory. Transfer time: {:.3} ms",
                    report.transfer_ms
                );
                println!("Average transfer FPS: {:.1}", report.transfer_fps);
            } else {
                println!("Image data received. Transfer FPS: {:.1}", report.transfer_fps);
            }
        }
    }
}

pub fn print_processing(stats: &ProcessingStats, format: OutputFormat) {
    let pass_ms: Vec<f64> = stats
        .passes()
        .iter()
        .map(|d| d.as_secs_f64() * 1000.0)
        .collect();

    match format {
        OutputFormat::Json => print_json(&ProcessingOutput {
            event: "processed",
            passes: stats.count(),
            pass_ms,
            total_ms: stats.total_ms(),
            average_fps: stats.average_fps(),
        }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["PASS", "ELAPSED MS"]);
            for (i, ms) in pass_ms.iter().enumerate() {
                table.add_row(vec![(i + 1).to_string(), format!("{ms:.6}")]);
            }
            table.add_row(vec![
                "average fps".to_string(),
                format!("{:.1}", stats.average_fps()),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for ms in &pass_ms {
                println!("Image data received and processed. Elapsed time: {ms:.6} ms");
            }
            println!("Average FPS: {:.1}", stats.average_fps());
        }
    }
}

pub fn print_pixels(frame: &FrameBuffer, label: &str, format: OutputFormat) {
    let rows = || {
        frame
            .first_n_pixels(DUMP_PIXEL_COUNT)
            .enumerate()
            .map(|(index, p)| PixelRow {
                index,
                r: p.r,
                g: p.g,
                b: p.b,
                a: p.a,
                hex: p.hex_channels().concat(),
            })
    };

    match format {
        OutputFormat::Json => print_json(&PixelOutput {
            event: "pixels",
            label,
            pixels: rows().collect(),
        }),
        OutputFormat::Table => {
            let mut table = new_table(vec![label, "R", "G", "B", "A", "HEX"]);
            for row in rows() {
                table.add_row(vec![
                    row.index.to_string(),
                    row.r.to_string(),
                    row.g.to_string(),
                    row.b.to_string(),
                    row.a.to_string(),
                    row.hex,
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{}", dump_pixels(frame, label));
        }
    }
}

/// Closing lines, pretty format only; structured formats end with their last record.
pub fn print_finished(format: OutputFormat) {
    if let OutputFormat::Pretty = format {
        println!("The program has terminated successfully.");
        println!("Note: You can exit the program anytime by pressing 'Ctrl+C'.");
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}
