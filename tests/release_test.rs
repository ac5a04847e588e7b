//! Verifies that packaged output really owns its memory: dropping the units
//! returns every byte the packaging step took, with nothing held back.
//!
//! The whole binary runs under a counting allocator, so this file keeps to a
//! single test; parallel tests would stomp on the shared counter.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicIsize, Ordering};

struct CountingAllocator;

static OUTSTANDING: AtomicIsize = AtomicIsize::new(0);

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            OUTSTANDING.fetch_add(layout.size() as isize, Ordering::SeqCst);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            OUTSTANDING.fetch_add(layout.size() as isize, Ordering::SeqCst);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        OUTSTANDING.fetch_sub(layout.size() as isize, Ordering::SeqCst);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            OUTSTANDING.fetch_add(new_size as isize - layout.size() as isize, Ordering::SeqCst);
        }
        new_ptr
    }
}

#[global_allocator]
static ALLOCATOR: CountingAllocator = CountingAllocator;

#[cfg(test)]
mod tests {
    use super::OUTSTANDING;
    use std::sync::atomic::Ordering;
    use xvcio::enc::{copy_nal_units, NalDescriptor};
    use xvcio::types::NALUnitType;
    use xvcio::NALUnit;

    fn outstanding() -> isize {
        OUTSTANDING.load(Ordering::SeqCst)
    }

    #[test]
    fn test_dropping_packaged_units_returns_every_byte() {
        // Warm up one-time allocations before taking the baseline.
        drop(NALUnit::from_payload(b"warmup", NALUnitType::Sei, 0).unwrap());

        let payloads: Vec<Vec<u8>> = (0..64_usize)
            .map(|i| vec![i as u8; (i * 37) % 1024])
            .collect();

        let baseline = outstanding();
        {
            let descriptors: Vec<NalDescriptor<'_>> = payloads
                .iter()
                .enumerate()
                .map(|(i, payload)| NalDescriptor {
                    payload,
                    nal_type: NALUnitType::from((i % 20) as u32),
                    user_data: i as i64,
                })
                .collect();
            let units = copy_nal_units(&descriptors).unwrap();
            drop(descriptors);

            assert_eq!(units.len(), payloads.len());
            assert!(
                outstanding() > baseline,
                "owned units should hold memory while alive"
            );
        }
        assert_eq!(
            outstanding(),
            baseline,
            "dropping the batch must return every byte it took"
        );

        // An empty batch takes nothing to begin with.
        let baseline = outstanding();
        drop(copy_nal_units(&[]).unwrap());
        assert_eq!(outstanding(), baseline);

        // A single unit built and released standalone behaves the same.
        let baseline = outstanding();
        {
            let unit = NALUnit::from_payload(&payloads[63], NALUnitType::IntraPicture, 9).unwrap();
            let framed = unit.into_bytes();
            assert!(!framed.is_empty());
        }
        assert_eq!(outstanding(), baseline);
    }
}
