use std::fs::File;
use std::io;
use std::os::fd::{AsRawFd, FromRawFd};
use std::os::unix::fs::MetadataExt;
use std::ptr::NonNull;
use std::sync::atomic::Ordering;

use tracing::{debug, info, warn};

use crate::error::{Result, SegmentError};
use crate::header::{
    SegmentHeader, HEADER_SIZE, LAYOUT_VERSION, MAGIC, STATE_DESTROYED, STATE_LIVE,
};
use crate::name::SegmentName;

/// Byte whose exclusive lock guards the data region and header bookkeeping.
const DATA_LOCK_BYTE: libc::off_t = 0;
/// Byte every attached handle holds a shared lock on.
const ATTACH_LOCK_BYTE: libc::off_t = 1;

/// Result of releasing a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detached {
    /// Other handles are still attached; the segment lives on.
    Released,
    /// No other handle was attached; the segment has been unlinked.
    Destroyed,
}

/// A handle to a named shared-memory segment.
///
/// The segment consists of a control header followed by `capacity` bytes of
/// data. Locking uses open-file-description byte-range locks on the segment
/// itself:
///
/// - byte 0 is the exclusive data lock behind [`SharedSegment::lock`];
/// - byte 1 carries a shared lock for every attached handle.
///
/// Both belong to the handle's own open file description, so two handles in
/// one process exclude each other the same way two processes do. The kernel
/// drops them when the last reference to the description goes away,
/// including when the process is killed. A segment whose attach byte nobody
/// holds is orphaned: the next [`SharedSegment::create_or_replace`] or
/// [`SharedSegment::attach`] unlinks it.
pub struct SharedSegment {
    name: SegmentName,
    file: File,
    map: Mapping,
    capacity: usize,
    identity: (u64, u64),
    released: bool,
}

// SAFETY: the mapping is owned by the handle and only reachable through
// `&self`/`&mut self`, so moving the handle to another thread is sound.
unsafe impl Send for SharedSegment {}

impl SharedSegment {
    /// Default permission mode for created segments.
    pub const DEFAULT_MODE: u32 = 0o600;

    /// Create a segment with `capacity` data bytes, replacing an orphaned one.
    ///
    /// An existing segment that no live handle is attached to is unlinked
    /// first. If a live attachment still holds the name, creation fails with
    /// [`SegmentError::Create`].
    pub fn create_or_replace(name: impl AsRef<str>, capacity: usize) -> Result<Self> {
        Self::create_or_replace_with_mode(name, capacity, Self::DEFAULT_MODE)
    }

    /// Create or replace a segment with explicit permission bits.
    pub fn create_or_replace_with_mode(
        name: impl AsRef<str>,
        capacity: usize,
        mode: u32,
    ) -> Result<Self> {
        let name = SegmentName::new(name)?;
        reclaim_orphan(&name)?;
        Self::create_named(name, capacity, mode)
    }

    /// Attach to an existing segment.
    ///
    /// Fails with [`SegmentError::NotFound`] if no live segment exists under
    /// `name`. An orphaned segment counts as missing and is unlinked.
    pub fn attach(name: impl AsRef<str>) -> Result<Self> {
        Self::attach_named(SegmentName::new(name)?)
    }

    /// Unlink `name` even if live handles are still attached.
    ///
    /// Existing mappings stay valid and their eventual detach leaves any
    /// newer segment under the name alone. Returns `false` if nothing was
    /// registered under the name.
    pub fn remove(name: impl AsRef<str>) -> Result<bool> {
        let name = SegmentName::new(name)?;
        match unlink(&name) {
            Ok(()) => {
                warn!(segment = %name, "removed segment name");
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(SegmentError::Io(err)),
        }
    }

    /// Whether an object is currently registered under `name`.
    pub fn exists(name: impl AsRef<str>) -> Result<bool> {
        let name = SegmentName::new(name)?;
        match open(&name, libc::O_RDONLY, 0) {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(SegmentError::Io(err)),
        }
    }

    fn create_named(name: SegmentName, capacity: usize, mode: u32) -> Result<Self> {
        let create_error = |name: &SegmentName, source| SegmentError::Create {
            name: name.to_string(),
            source,
        };

        if capacity == 0 {
            return Err(create_error(
                &name,
                io::Error::new(io::ErrorKind::InvalidInput, "capacity must be non-zero"),
            ));
        }
        let map_len = HEADER_SIZE.checked_add(capacity).ok_or_else(|| {
            create_error(
                &name,
                io::Error::new(io::ErrorKind::InvalidInput, "capacity overflows mapping size"),
            )
        })?;

        let file = open(&name, libc::O_CREAT | libc::O_EXCL | libc::O_RDWR, mode)
            .map_err(|source| create_error(&name, source))?;

        // Attachers block on the data lock until the header is complete.
        let lock = match RangeLock::acquire(&file, DATA_LOCK_BYTE).and_then(|lock| {
            set_lock(&file, ATTACH_LOCK_BYTE, LockKind::Shared, false).map(|()| lock)
        }) {
            Ok(lock) => lock,
            Err(source) => {
                let _ = unlink(&name);
                return Err(lock_error(&name, source));
            }
        };

        let built = file
            .set_len(map_len as u64)
            .and_then(|()| Mapping::new(&file, map_len))
            .and_then(|map| identity(&file).map(|id| (map, id)));
        let (map, identity) = match built {
            Ok(parts) => parts,
            Err(source) => {
                let _ = unlink(&name);
                return Err(create_error(&name, source));
            }
        };

        let header = map.header();
        header.version.store(LAYOUT_VERSION, Ordering::Relaxed);
        header.capacity.store(capacity as u64, Ordering::Relaxed);
        header.published.store(0, Ordering::Relaxed);
        header.acknowledged.store(0, Ordering::Relaxed);
        header.state.store(STATE_LIVE, Ordering::Relaxed);
        header.magic.store(MAGIC, Ordering::Release);
        drop(lock);

        info!(segment = %name, capacity, "created shared segment");

        Ok(Self {
            name,
            file,
            map,
            capacity,
            identity,
            released: false,
        })
    }

    fn attach_named(name: SegmentName) -> Result<Self> {
        let not_found = |name: &SegmentName| SegmentError::NotFound {
            name: name.to_string(),
        };

        let file = match open(&name, libc::O_RDWR, 0) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(not_found(&name)),
            Err(source) => {
                return Err(SegmentError::Attach {
                    name: name.to_string(),
                    source,
                });
            }
        };

        let lock =
            RangeLock::acquire(&file, DATA_LOCK_BYTE).map_err(|source| lock_error(&name, source))?;

        let metadata = file.metadata()?;
        let map_len = usize::try_from(metadata.len()).map_err(|_| SegmentError::Invalid {
            name: name.to_string(),
            reason: "segment larger than address space".to_string(),
        })?;
        if map_len == 0 {
            // Mid-creation by a process that has not taken the lock yet.
            return Err(not_found(&name));
        }

        let id = identity(&file)?;
        if is_orphaned(&file).map_err(|source| lock_error(&name, source))? {
            unlink_if_same(&name, id);
            warn!(segment = %name, "reclaimed segment with no live attachments");
            return Err(not_found(&name));
        }

        if map_len < HEADER_SIZE {
            return Err(SegmentError::Invalid {
                name: name.to_string(),
                reason: format!("{map_len} bytes is smaller than the control header"),
            });
        }

        let map = Mapping::new(&file, map_len).map_err(|source| SegmentError::Attach {
            name: name.to_string(),
            source,
        })?;
        let header = map.header();

        if header.magic.load(Ordering::Acquire) != MAGIC {
            return Err(SegmentError::Invalid {
                name: name.to_string(),
                reason: "missing segment magic".to_string(),
            });
        }
        let version = header.version.load(Ordering::Relaxed);
        if version != LAYOUT_VERSION {
            return Err(SegmentError::Invalid {
                name: name.to_string(),
                reason: format!("layout version {version}, expected {LAYOUT_VERSION}"),
            });
        }
        if header.state.load(Ordering::Acquire) == STATE_DESTROYED {
            return Err(not_found(&name));
        }
        let capacity = header.capacity.load(Ordering::Relaxed) as usize;
        if HEADER_SIZE.checked_add(capacity) != Some(map_len) {
            return Err(SegmentError::Invalid {
                name: name.to_string(),
                reason: format!("header capacity {capacity} disagrees with size {map_len}"),
            });
        }

        // Exclusive checks of the attach byte only run under the data lock,
        // which is held here.
        set_lock(&file, ATTACH_LOCK_BYTE, LockKind::Shared, false)
            .map_err(|source| lock_error(&name, source))?;
        drop(lock);

        info!(segment = %name, capacity, "attached to shared segment");

        Ok(Self {
            name,
            file,
            map,
            capacity,
            identity: id,
            released: false,
        })
    }

    /// The segment name.
    pub fn name(&self) -> &SegmentName {
        &self.name
    }

    /// Size of the data region in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Highest sequence number published into the segment (0 = none yet).
    pub fn published(&self) -> u64 {
        self.header().published.load(Ordering::Acquire)
    }

    /// Highest sequence number a reader has acknowledged.
    pub fn acknowledged(&self) -> u64 {
        self.header().acknowledged.load(Ordering::Acquire)
    }

    /// Read-only view of the data region, without taking the lock.
    ///
    /// Another process may be writing concurrently; use [`SharedSegment::lock`]
    /// when the contents must be consistent.
    pub fn data(&self) -> &[u8] {
        self.map.data(self.capacity)
    }

    /// Mutable view of the data region, without taking the lock.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.map.data_mut(self.capacity)
    }

    /// Acquire the segment lock, blocking until it is available.
    pub fn lock(&mut self) -> Result<SegmentGuard<'_>> {
        set_lock(&self.file, DATA_LOCK_BYTE, LockKind::Exclusive, true)
            .map_err(|source| lock_error(&self.name, source))?;
        debug!(segment = %self.name, "segment locked");
        Ok(SegmentGuard {
            segment: self,
            locked: true,
        })
    }

    /// Acquire the segment lock if it is free.
    ///
    /// Returns `Ok(None)` when another handle holds it.
    pub fn try_lock(&mut self) -> Result<Option<SegmentGuard<'_>>> {
        match set_lock(&self.file, DATA_LOCK_BYTE, LockKind::Exclusive, false) {
            Ok(()) => Ok(Some(SegmentGuard {
                segment: self,
                locked: true,
            })),
            Err(err) if is_contended(&err) => Ok(None),
            Err(source) => Err(lock_error(&self.name, source)),
        }
    }

    /// Release this handle's attachment.
    ///
    /// If no other handle is attached, the segment is marked destroyed and
    /// its name unlinked.
    pub fn detach(mut self) -> Result<Detached> {
        self.release()
    }

    fn release(&mut self) -> Result<Detached> {
        self.released = true;

        let lock = RangeLock::acquire(&self.file, DATA_LOCK_BYTE)
            .map_err(|source| lock_error(&self.name, source))?;

        // Upgrading our own shared lock succeeds only if nobody else holds one.
        let last = match set_lock(&self.file, ATTACH_LOCK_BYTE, LockKind::Exclusive, false) {
            Ok(()) => true,
            Err(err) if is_contended(&err) => false,
            Err(source) => return Err(lock_error(&self.name, source)),
        };
        if last {
            self.header().state.store(STATE_DESTROYED, Ordering::Release);
            unlink_if_same(&self.name, self.identity);
        }
        set_lock(&self.file, ATTACH_LOCK_BYTE, LockKind::Unlock, false)
            .map_err(|source| lock_error(&self.name, source))?;
        drop(lock);

        if last {
            info!(segment = %self.name, "destroyed shared segment");
            Ok(Detached::Destroyed)
        } else {
            debug!(segment = %self.name, "detached from shared segment");
            Ok(Detached::Released)
        }
    }

    fn header(&self) -> &SegmentHeader {
        self.map.header()
    }
}

impl Drop for SharedSegment {
    fn drop(&mut self) {
        if !self.released {
            if let Err(err) = self.release() {
                warn!(segment = %self.name, error = %err, "failed to release segment on drop");
            }
        }
    }
}

impl std::fmt::Debug for SharedSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSegment")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// Exclusive access to a segment, released on drop.
///
/// Readers and writers share the same lock. Sequence numbers should be
/// updated through the guard so that they change atomically with the data.
pub struct SegmentGuard<'a> {
    segment: &'a mut SharedSegment,
    locked: bool,
}

impl SegmentGuard<'_> {
    /// Data region.
    pub fn data(&self) -> &[u8] {
        self.segment.data()
    }

    /// Mutable data region.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.segment.data_mut()
    }

    /// Highest published sequence number.
    pub fn published(&self) -> u64 {
        self.segment.published()
    }

    /// Mark the current data region as a new version and return its sequence.
    pub fn publish(&mut self) -> u64 {
        let header = self.segment.header();
        let next = header.published.load(Ordering::Acquire).wrapping_add(1);
        header.published.store(next, Ordering::Release);
        next
    }

    /// Highest acknowledged sequence number.
    pub fn acknowledged(&self) -> u64 {
        self.segment.acknowledged()
    }

    /// Record that the version `sequence` has been read.
    pub fn acknowledge(&mut self, sequence: u64) {
        let header = self.segment.header();
        if sequence > header.acknowledged.load(Ordering::Acquire) {
            header.acknowledged.store(sequence, Ordering::Release);
        }
    }

    /// Release the lock, reporting failure instead of ignoring it.
    pub fn unlock(mut self) -> Result<()> {
        self.locked = false;
        set_lock(&self.segment.file, DATA_LOCK_BYTE, LockKind::Unlock, false)
            .map_err(|source| lock_error(&self.segment.name, source))?;
        debug!(segment = %self.segment.name, "segment unlocked");
        Ok(())
    }
}

impl Drop for SegmentGuard<'_> {
    fn drop(&mut self) {
        if self.locked {
            let _ = set_lock(&self.segment.file, DATA_LOCK_BYTE, LockKind::Unlock, false);
        }
    }
}

/// A shared read/write mapping of a whole segment.
struct Mapping {
    base: NonNull<u8>,
    len: usize,
}

impl Mapping {
    fn new(file: &File, len: usize) -> io::Result<Self> {
        // SAFETY: `file` is an open shared-memory descriptor of at least
        // `len` bytes; a null hint lets the kernel pick the address.
        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                0,
            )
        };
        if ptr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }
        let base = NonNull::new(ptr.cast::<u8>())
            .ok_or_else(|| io::Error::other("mmap returned a null mapping"))?;
        Ok(Self { base, len })
    }

    fn header(&self) -> &SegmentHeader {
        // SAFETY: mappings are page aligned and always at least HEADER_SIZE
        // bytes; the header consists of atomics and padding only.
        unsafe { &*self.base.as_ptr().cast::<SegmentHeader>() }
    }

    fn data(&self, capacity: usize) -> &[u8] {
        debug_assert!(HEADER_SIZE + capacity <= self.len);
        // SAFETY: the data region lies entirely within the mapping.
        unsafe { std::slice::from_raw_parts(self.base.as_ptr().add(HEADER_SIZE), capacity) }
    }

    fn data_mut(&mut self, capacity: usize) -> &mut [u8] {
        debug_assert!(HEADER_SIZE + capacity <= self.len);
        // SAFETY: as in `data`; `&mut self` rules out aliasing within this handle.
        unsafe { std::slice::from_raw_parts_mut(self.base.as_ptr().add(HEADER_SIZE), capacity) }
    }
}

impl Drop for Mapping {
    fn drop(&mut self) {
        // SAFETY: `base`/`len` describe a mapping created by `Mapping::new`
        // and no borrow of it outlives `self`.
        unsafe {
            libc::munmap(self.base.as_ptr().cast::<libc::c_void>(), self.len);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LockKind {
    Shared,
    Exclusive,
    Unlock,
}

impl LockKind {
    fn l_type(self) -> libc::c_short {
        (match self {
            LockKind::Shared => libc::F_RDLCK,
            LockKind::Exclusive => libc::F_WRLCK,
            LockKind::Unlock => libc::F_UNLCK,
        }) as libc::c_short
    }
}

/// Holds the exclusive lock on one byte for internal bookkeeping.
struct RangeLock<'a> {
    file: &'a File,
    byte: libc::off_t,
}

impl<'a> RangeLock<'a> {
    fn acquire(file: &'a File, byte: libc::off_t) -> io::Result<Self> {
        set_lock(file, byte, LockKind::Exclusive, true)?;
        Ok(Self { file, byte })
    }
}

impl Drop for RangeLock<'_> {
    fn drop(&mut self) {
        let _ = set_lock(self.file, self.byte, LockKind::Unlock, false);
    }
}

/// Apply an open-file-description lock to the single byte at `byte`.
fn set_lock(file: &File, byte: libc::off_t, kind: LockKind, wait: bool) -> io::Result<()> {
    // SAFETY: `libc::flock` is a plain C struct for which all-zero is valid;
    // OFD locks additionally require `l_pid == 0`.
    let mut region: libc::flock = unsafe { std::mem::zeroed() };
    region.l_type = kind.l_type();
    region.l_whence = libc::SEEK_SET as libc::c_short;
    region.l_start = byte;
    region.l_len = 1;

    let command = if wait {
        libc::F_OFD_SETLKW
    } else {
        libc::F_OFD_SETLK
    };
    loop {
        // SAFETY: `file` owns an open descriptor and `region` outlives the call.
        let rc = unsafe { libc::fcntl(file.as_raw_fd(), command, &region as *const libc::flock) };
        if rc == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

fn is_contended(err: &io::Error) -> bool {
    matches!(err.raw_os_error(), Some(libc::EAGAIN) | Some(libc::EACCES))
}

/// Whether no handle holds the attach byte of `file`.
///
/// Callers hold the data lock so that no attach or release runs meanwhile.
fn is_orphaned(file: &File) -> io::Result<bool> {
    match set_lock(file, ATTACH_LOCK_BYTE, LockKind::Exclusive, false) {
        Ok(()) => {
            set_lock(file, ATTACH_LOCK_BYTE, LockKind::Unlock, false)?;
            Ok(true)
        }
        Err(err) if is_contended(&err) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Unlink a segment under `name` that nobody is attached to.
fn reclaim_orphan(name: &SegmentName) -> Result<()> {
    let file = match open(name, libc::O_RDWR, 0) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(SegmentError::Attach {
                name: name.to_string(),
                source,
            });
        }
    };
    let _lock =
        RangeLock::acquire(&file, DATA_LOCK_BYTE).map_err(|source| lock_error(name, source))?;

    if is_orphaned(&file).map_err(|source| lock_error(name, source))? {
        unlink_if_same(name, identity(&file)?);
        warn!(segment = %name, "reclaimed segment with no live attachments");
    } else {
        debug!(segment = %name, "existing segment still attached");
    }
    Ok(())
}

/// Unlink `name` only if it still refers to the segment with `expected`
/// identity; after a forced [`SharedSegment::remove`] it may belong to a
/// newer one.
fn unlink_if_same(name: &SegmentName, expected: (u64, u64)) {
    let current = open(name, libc::O_RDONLY, 0).and_then(|file| identity(&file));
    match current {
        Ok(id) if id == expected => {
            if let Err(err) = unlink(name) {
                warn!(segment = %name, error = %err, "failed to unlink segment");
            }
        }
        Ok(_) => {
            debug!(segment = %name, "segment name reused; skipping unlink");
        }
        Err(_) => {
            debug!(segment = %name, "segment name already gone");
        }
    }
}

fn lock_error(name: &SegmentName, source: io::Error) -> SegmentError {
    SegmentError::Lock {
        name: name.to_string(),
        source,
    }
}

fn open(name: &SegmentName, flags: libc::c_int, mode: u32) -> io::Result<File> {
    // SAFETY: the path is a valid NUL-terminated string owned by `name`.
    let fd = unsafe { libc::shm_open(name.as_c_str().as_ptr(), flags, mode as libc::mode_t) };
    if fd < 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: `fd` was just returned by shm_open and is owned by nobody else.
    Ok(unsafe { File::from_raw_fd(fd) })
}

fn unlink(name: &SegmentName) -> io::Result<()> {
    // SAFETY: the pointer is a valid NUL-terminated string owned by `name`.
    let rc = unsafe { libc::shm_unlink(name.as_c_str().as_ptr()) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

fn identity(file: &File) -> io::Result<(u64, u64)> {
    let metadata = file.metadata()?;
    Ok((metadata.dev(), metadata.ino()))
}

#[cfg(test)]
impl SharedSegment {
    /// Close the handle the way process exit does: the kernel drops its
    /// locks, but nothing is written to the header and nothing is unlinked.
    fn close_without_detach(mut self) {
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_name(tag: &str) -> String {
        format!(
            "sf-{tag}-{:x}-{:08x}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .subsec_nanos()
        )
    }

    #[test]
    fn test_create_attach_share_bytes() {
        let name = unique_name("share");
        let mut writer = SharedSegment::create_or_replace(&name, 4096).unwrap();
        assert_eq!(writer.capacity(), 4096);

        {
            let mut guard = writer.lock().unwrap();
            guard.data_mut().fill(0x5A);
            assert_eq!(guard.publish(), 1);
        }

        let mut reader = SharedSegment::attach(&name).unwrap();
        assert_eq!(reader.capacity(), 4096);
        assert_eq!(reader.published(), 1);

        let guard = reader.lock().unwrap();
        assert!(guard.data().iter().all(|&b| b == 0x5A));
        guard.unlock().unwrap();

        assert_eq!(writer.detach().unwrap(), Detached::Released);
        assert_eq!(reader.detach().unwrap(), Detached::Destroyed);
        assert!(!SharedSegment::exists(&name).unwrap());
    }

    #[test]
    fn test_attach_missing_is_not_found() {
        let result = SharedSegment::attach(unique_name("missing"));
        assert!(matches!(result, Err(SegmentError::NotFound { .. })));
    }

    #[test]
    fn test_recreate_after_release_has_no_residue() {
        let name = unique_name("rerun");

        let mut first = SharedSegment::create_or_replace(&name, 1024).unwrap();
        first.data_mut().fill(0xAA);
        drop(first);

        let mut second = SharedSegment::create_or_replace(&name, 1024).unwrap();
        assert!(second.data().iter().all(|&b| b == 0));
        second.data_mut().fill(0xBB);

        let reader = SharedSegment::attach(&name).unwrap();
        assert!(reader.data().iter().all(|&b| b == 0xBB));
    }

    #[test]
    fn test_create_reclaims_segment_left_by_exited_holder() {
        let name = unique_name("orphan");
        let mut holder = SharedSegment::create_or_replace(&name, 512).unwrap();
        holder.lock().unwrap().publish();
        holder.close_without_detach();
        assert!(SharedSegment::exists(&name).unwrap());

        let mut fresh = SharedSegment::create_or_replace(&name, 256).unwrap();
        assert_eq!(fresh.capacity(), 256);
        assert_eq!(fresh.lock().unwrap().published(), 0);
        assert_eq!(fresh.detach().unwrap(), Detached::Destroyed);
        assert!(!SharedSegment::exists(&name).unwrap());
    }

    #[test]
    fn test_attach_to_segment_left_by_exited_holder_is_not_found() {
        let name = unique_name("gone");
        let holder = SharedSegment::create_or_replace(&name, 64).unwrap();
        holder.close_without_detach();

        let result = SharedSegment::attach(&name);
        assert!(matches!(result, Err(SegmentError::NotFound { .. })));
        assert!(!SharedSegment::exists(&name).unwrap());
    }

    #[test]
    fn test_live_attachment_blocks_create_until_removed() {
        let name = unique_name("held");
        let mut holder = SharedSegment::create_or_replace(&name, 128).unwrap();
        holder.data_mut().fill(0x11);
        let other = SharedSegment::attach(&name).unwrap();

        let result = SharedSegment::create_or_replace(&name, 128);
        assert!(matches!(result, Err(SegmentError::Create { .. })));
        assert!(holder.data().iter().all(|&b| b == 0x11));

        // A single remaining handle still counts as live.
        assert_eq!(other.detach().unwrap(), Detached::Released);
        let result = SharedSegment::create_or_replace(&name, 128);
        assert!(matches!(result, Err(SegmentError::Create { .. })));

        assert!(SharedSegment::remove(&name).unwrap());
        let fresh = SharedSegment::create_or_replace(&name, 128).unwrap();
        assert!(fresh.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_lock_excludes_other_handles() {
        let name = unique_name("lock");
        let mut a = SharedSegment::create_or_replace(&name, 64).unwrap();
        let mut b = SharedSegment::attach(&name).unwrap();

        let guard = a.lock().unwrap();
        assert!(b.try_lock().unwrap().is_none());
        drop(guard);

        let guard = b.try_lock().unwrap();
        assert!(guard.is_some());
        drop(guard);

        let handle = std::thread::spawn(move || {
            let mut guard = b.lock().unwrap();
            guard.data_mut()[0] = 7;
            guard.publish();
            drop(guard);
            b
        });
        let b = handle.join().unwrap();
        assert_eq!(a.data()[0], 7);
        assert_eq!(a.published(), 1);
        drop(b);
    }

    #[test]
    fn test_acknowledge_is_monotonic() {
        let name = unique_name("ack");
        let mut segment = SharedSegment::create_or_replace(&name, 64).unwrap();
        let mut guard = segment.lock().unwrap();
        guard.acknowledge(3);
        guard.acknowledge(2);
        assert_eq!(guard.acknowledged(), 3);
    }

    #[test]
    fn test_remove_reclaims_name_without_touching_new_segment() {
        let name = unique_name("remove");
        let old = SharedSegment::create_or_replace(&name, 64).unwrap();
        assert!(SharedSegment::remove(&name).unwrap());
        assert!(!SharedSegment::remove(&name).unwrap());

        let new = SharedSegment::create_or_replace(&name, 64).unwrap();
        assert_eq!(old.detach().unwrap(), Detached::Destroyed);
        assert!(
            SharedSegment::exists(&name).unwrap(),
            "old handle must not unlink a segment that replaced it"
        );

        assert_eq!(new.detach().unwrap(), Detached::Destroyed);
        assert!(!SharedSegment::exists(&name).unwrap());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = SharedSegment::create_or_replace(unique_name("zero"), 0);
        assert!(matches!(result, Err(SegmentError::Create { .. })));
    }
}
