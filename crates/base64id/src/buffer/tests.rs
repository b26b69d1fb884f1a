use crate::{
    BufferConfig, BufferedRandom, Error, InlineRefill, RandSource, RefillSpawner, Result,
    ThreadRandom, ThreadRefill,
};
use core::cell::RefCell;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread::scope;

/// Fills every request with a running byte counter and records each request
/// length, so tests can tell chunk draws from direct draws and predict the
/// exact bytes of any slot.
#[derive(Clone, Default)]
struct CountingRand {
    inner: Arc<Mutex<CountingState>>,
}

#[derive(Default)]
struct CountingState {
    next: u8,
    requests: Vec<usize>,
}

impl CountingRand {
    fn requests(&self) -> Vec<usize> {
        self.inner.lock().unwrap().requests.clone()
    }

    /// Bytes the next `len`-byte draw would start with, `offset` bytes in.
    fn expected(first: u8, offset: usize, len: usize) -> Vec<u8> {
        (0..len)
            .map(|i| first.wrapping_add((offset + i) as u8))
            .collect()
    }
}

impl RandSource for CountingRand {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        let mut state = self.inner.lock().unwrap();
        state.requests.push(dest.len());
        for b in dest.iter_mut() {
            *b = state.next;
            state.next = state.next.wrapping_add(1);
        }
        Ok(())
    }
}

struct FailingRand;

impl RandSource for FailingRand {
    fn fill(&self, _dest: &mut [u8]) -> Result<()> {
        Err(Error::SourceUnavailable("entropy pool closed".into()))
    }
}

type Job = Box<dyn FnOnce() -> Result<()> + Send>;

thread_local! {
    static PARKED: RefCell<Vec<Job>> = const { RefCell::new(Vec::new()) };
}

/// Parks refill jobs on the current thread until the test runs them, which
/// models a background refill that has not completed yet.
struct ParkedRefill;

impl ParkedRefill {
    fn parked() -> usize {
        PARKED.with(|jobs| jobs.borrow().len())
    }

    fn run_parked() -> Vec<Result<()>> {
        let jobs: Vec<Job> = PARKED.with(|jobs| jobs.borrow_mut().drain(..).collect());
        jobs.into_iter().map(|job| job()).collect()
    }
}

impl RefillSpawner for ParkedRefill {
    fn spawn_refill<F>(job: F) -> Option<Result<()>>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        PARKED.with(|jobs| jobs.borrow_mut().push(Box::new(job)));
        None
    }
}

const SLOTS: usize = 341;
const THRESHOLD: usize = 289;

#[test]
fn first_request_draws_a_chunk_inline() {
    let source = CountingRand::default();
    let rng = BufferedRandom::<_, InlineRefill>::new(source.clone());

    let bytes = rng.get_bytes(12);

    assert_eq!(source.requests(), vec![4096]);
    assert_eq!(bytes, CountingRand::expected(0, 0, 12));
    let snapshot = rng.snapshot().unwrap();
    assert_eq!(snapshot.cursor, Some(1));
    assert!(snapshot.has_chunk);
    assert!(!snapshot.refill_in_flight);
}

#[test]
fn nothing_is_drawn_before_the_first_request() {
    let source = CountingRand::default();
    let rng = BufferedRandom::<_, InlineRefill>::new(source.clone());

    assert!(source.requests().is_empty());
    let snapshot = rng.snapshot().unwrap();
    assert_eq!(snapshot.cursor, None);
    assert!(!snapshot.has_chunk);
}

#[test]
fn consecutive_slots_are_disjoint() {
    let source = CountingRand::default();
    let rng = BufferedRandom::<_, InlineRefill>::new(source.clone());

    for k in 0..=THRESHOLD {
        let bytes = rng.get_bytes(12);
        assert_eq!(bytes, CountingRand::expected(0, 12 * k, 12), "slot {k}");
    }
    assert_eq!(source.requests(), vec![4096]);
}

#[test]
fn inline_refill_replaces_the_chunk_past_threshold() {
    let source = CountingRand::default();
    let rng = BufferedRandom::<_, InlineRefill>::new(source.clone());

    for _ in 0..=THRESHOLD {
        rng.get_bytes(12);
    }
    assert_eq!(rng.snapshot().unwrap().cursor, Some(THRESHOLD + 1));

    // cursor is now past the threshold: this request redraws and reads slot 0
    let bytes = rng.get_bytes(12);
    assert_eq!(source.requests(), vec![4096, 4096]);
    // 4096 % 256 == 0, so the second chunk starts where the first did
    assert_eq!(bytes, CountingRand::expected(0, 0, 12));
    assert_eq!(rng.snapshot().unwrap().cursor, Some(1));
}

#[test]
fn falls_back_to_direct_draws_until_refill_lands() {
    let source = CountingRand::default();
    let rng = BufferedRandom::<_, ParkedRefill>::new(source.clone());

    rng.get_bytes(12);
    rng.get_bytes(12);

    // one refill dispatched, never a second while it is outstanding
    assert_eq!(ParkedRefill::parked(), 1);
    assert_eq!(source.requests(), vec![12, 12]);
    let snapshot = rng.snapshot().unwrap();
    assert_eq!(snapshot.cursor, None);
    assert!(snapshot.refill_in_flight);

    assert_eq!(ParkedRefill::run_parked(), vec![Ok(())]);
    let snapshot = rng.snapshot().unwrap();
    assert_eq!(snapshot.cursor, Some(0));
    assert!(!snapshot.refill_in_flight);

    // the chunk was the third draw, starting after 24 counter bytes
    let bytes = rng.get_bytes(12);
    assert_eq!(bytes, CountingRand::expected(24, 0, 12));
    assert_eq!(source.requests(), vec![12, 12, 4096]);
}

#[test]
fn background_refill_keeps_serving_the_old_chunk() {
    let source = CountingRand::default();
    let rng = BufferedRandom::<_, ParkedRefill>::new(source.clone());

    rng.get_bytes(12);
    ParkedRefill::run_parked();
    // 12 direct bytes, then the chunk
    let first = 12;

    for k in 0..=THRESHOLD {
        assert_eq!(rng.get_bytes(12), CountingRand::expected(first, 12 * k, 12));
    }
    assert_eq!(ParkedRefill::parked(), 0);

    // past the threshold: a refill is dispatched but the old chunk is still read
    for k in THRESHOLD + 1..SLOTS {
        assert_eq!(rng.get_bytes(12), CountingRand::expected(first, 12 * k, 12));
    }
    assert_eq!(ParkedRefill::parked(), 1);
    assert_eq!(rng.snapshot().unwrap().cursor, Some(SLOTS));

    // exhausted: the chunk is dropped and the request is drawn directly
    rng.get_bytes(12);
    assert_eq!(ParkedRefill::parked(), 1);
    let snapshot = rng.snapshot().unwrap();
    assert!(!snapshot.has_chunk);
    assert_eq!(snapshot.cursor, None);
    assert_eq!(source.requests(), vec![12, 4096, 12]);

    ParkedRefill::run_parked();
    assert_eq!(rng.snapshot().unwrap().cursor, Some(0));
}

#[test]
fn no_slot_is_served_twice() {
    let rng = BufferedRandom::<_, InlineRefill>::new(ThreadRandom);
    let mut seen = HashSet::new();
    for _ in 0..4 * SLOTS {
        assert!(seen.insert(rng.get_bytes(16)));
    }
}

#[test]
fn oversized_requests_bypass_the_buffer() {
    let source = CountingRand::default();
    let rng = BufferedRandom::<_, InlineRefill>::new(source.clone());

    let bytes = rng.get_bytes(5000);

    assert_eq!(bytes.len(), 5000);
    assert_eq!(source.requests(), vec![5000]);
    assert!(!rng.snapshot().unwrap().has_chunk);
}

#[test]
fn zero_threshold_requests_bypass_the_buffer() {
    let source = CountingRand::default();
    let rng = BufferedRandom::<_, InlineRefill>::new(source.clone());

    rng.get_bytes(3000);
    assert_eq!(source.requests(), vec![3000]);

    rng.get_bytes(2048);
    assert_eq!(source.requests(), vec![3000, 4096]);
}

#[test]
fn zero_length_defaults_to_twelve() {
    let rng = BufferedRandom::<_, InlineRefill>::new(CountingRand::default());
    assert_eq!(rng.try_get_bytes(0).unwrap().len(), 12);
}

#[test]
fn mixed_widths_never_overlap() {
    let source = CountingRand::default();
    let rng = BufferedRandom::<_, InlineRefill>::new(source.clone());

    // slot 0 of width 12: [0, 12)
    assert_eq!(rng.get_bytes(12), CountingRand::expected(0, 0, 12));
    // cursor 1*12 bytes -> ceil(12 / 5) = 3: [15, 20)
    assert_eq!(rng.get_bytes(5), CountingRand::expected(0, 15, 5));
    // cursor 4*5 bytes -> ceil(20 / 12) = 2: [24, 36)
    assert_eq!(rng.get_bytes(12), CountingRand::expected(0, 24, 12));
    assert_eq!(source.requests(), vec![4096]);
}

#[test]
fn inline_refill_failure_propagates() {
    let rng = BufferedRandom::<_, InlineRefill>::new(FailingRand);

    let err = rng.try_get_bytes(12).unwrap_err();

    assert!(matches!(err, Error::SourceUnavailable(_)));
    assert!(!rng.snapshot().unwrap().refill_in_flight);
}

#[test]
fn direct_draw_failure_propagates() {
    let rng = BufferedRandom::<_, InlineRefill>::new(FailingRand);
    assert!(matches!(
        rng.try_get_bytes(5000),
        Err(Error::SourceUnavailable(_))
    ));
}

#[test]
fn failed_background_refill_is_redispatched() {
    let rng = BufferedRandom::<_, ParkedRefill>::new(FailingRand);

    assert!(rng.try_get_bytes(12).is_err());
    let results = ParkedRefill::run_parked();
    assert!(matches!(results.as_slice(), [Err(Error::SourceUnavailable(_))]));
    assert!(!rng.snapshot().unwrap().refill_in_flight);

    assert!(rng.try_get_bytes(12).is_err());
    assert_eq!(ParkedRefill::parked(), 1);
    ParkedRefill::run_parked();
}

#[test]
fn clones_share_one_buffer() {
    let source = CountingRand::default();
    let rng = BufferedRandom::<_, InlineRefill>::new(source.clone());
    let other = rng.clone();

    rng.get_bytes(12);
    assert_eq!(other.get_bytes(12), CountingRand::expected(0, 12, 12));
    assert_eq!(source.requests(), vec![4096]);
}

#[test]
fn custom_chunk_size_is_respected() {
    let source = CountingRand::default();
    let config = BufferConfig::default()
        .with_chunk_size(120)
        .with_refill_ratio(0.5);
    let rng = BufferedRandom::<_, InlineRefill>::with_config(source.clone(), config);

    // 10 slots, threshold 5: slots 0..=5 come from the first chunk
    for _ in 0..6 {
        rng.get_bytes(12);
    }
    assert_eq!(source.requests(), vec![120]);
    rng.get_bytes(12);
    assert_eq!(source.requests(), vec![120, 120]);
}

#[test]
fn concurrent_threads_never_share_a_slot() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 2048;

    let rng = BufferedRandom::<_, ThreadRefill>::new(ThreadRandom);
    let all = Mutex::new(HashSet::with_capacity(THREADS * PER_THREAD));

    scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                let local: Vec<_> = (0..PER_THREAD).map(|_| rng.get_bytes(12)).collect();
                let mut all = all.lock().unwrap();
                for bytes in local {
                    assert!(all.insert(bytes), "slot served twice");
                }
            });
        }
    });

    assert_eq!(all.into_inner().unwrap().len(), THREADS * PER_THREAD);
}
