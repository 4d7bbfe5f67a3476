//! Boot Pool Allocator
//!
//! Uses `linked_list_allocator` to carve permanent allocations out of a
//! fixed `'static` memory region handed over by the platform at boot.
//!
//! # Lifetime
//! Nothing allocated from a [`BootPool`] is ever returned to it. Every
//! allocation lives for the rest of the boot stage, which is what lets
//! [`BootPool::allocate`] hand out `&'static mut` references.

use core::alloc::Layout;
use core::mem::MaybeUninit;

use linked_list_allocator::Heap;
use spin::Mutex;

/// A fixed-size pool for boot-time allocations that are never freed.
pub struct BootPool {
    heap: Mutex<Heap>,
}

impl BootPool {
    /// Create a pool with no backing memory. Every allocation fails until
    /// [`BootPool::init`] is called.
    pub const fn empty() -> Self {
        Self {
            heap: Mutex::new(Heap::empty()),
        }
    }

    /// Create a pool backed by `mem`.
    pub fn new(mem: &'static mut [MaybeUninit<u8>]) -> Self {
        Self {
            heap: Mutex::new(Heap::from_slice(mem)),
        }
    }

    /// Hand the backing region to an empty pool.
    ///
    /// # Panics
    /// Panics if the pool was already initialized.
    pub fn init(&self, mem: &'static mut [MaybeUninit<u8>]) {
        let mut heap = self.heap.lock();
        assert!(heap.size() == 0, "boot pool initialized twice");
        heap.init_from_slice(mem);
    }

    /// Move `value` into pool memory and return a permanent reference to it.
    ///
    /// Returns `None` if the pool cannot satisfy the allocation. A failed
    /// allocation leaves the pool untouched.
    pub fn allocate<T>(&self, value: T) -> Option<&'static mut T> {
        let ptr = self
            .heap
            .lock()
            .allocate_first_fit(Layout::new::<T>())
            .ok()?
            .cast::<T>();

        // SAFETY:
        // - `ptr` was just allocated with the layout of `T`, so it is
        //   non-null, aligned and large enough
        // - the backing region is `'static` and the pool never frees, so no
        //   other reference to this memory can exist now or later
        unsafe {
            ptr.as_ptr().write(value);
            Some(&mut *ptr.as_ptr())
        }
    }

    /// Total bytes managed by the pool.
    pub fn size(&self) -> usize {
        self.heap.lock().size()
    }

    /// Bytes handed out so far.
    pub fn used(&self) -> usize {
        self.heap.lock().used()
    }

    /// Bytes still available.
    pub fn free(&self) -> usize {
        self.heap.lock().free()
    }
}

/// Process-wide boot pool used by the C entry point.
pub static BOOT_POOL: BootPool = BootPool::empty();

/// Initialize the process-wide boot pool.
///
/// Must be called once during platform bring-up, before the memory map is
/// requested through the C entry point.
pub fn init_boot_pool(mem: &'static mut [MaybeUninit<u8>]) {
    BOOT_POOL.init(mem);
    log::debug!("boot pool initialized ({} bytes)", BOOT_POOL.size());
}
