use crate::{
    ClockRecovery, Error, IdGenStatus, Layout, LockSnowflakeGenerator, NodeIdentity, Sleep,
    SnowflakeGenerator, SnowflakeId, TimeSource,
};
use core::time::Duration;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::thread::scope;

/// A clock that only moves when told to.
#[derive(Clone, Default)]
struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    fn at(millis: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(millis)),
        }
    }

    fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl TimeSource for ManualClock {
    fn current_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Records every requested sleep and optionally nudges the clock forward.
struct RecordingSleep {
    clock: ManualClock,
    advance_after: Option<usize>,
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleep {
    fn never_advancing(clock: ManualClock) -> Self {
        Self {
            clock,
            advance_after: None,
            sleeps: Mutex::new(Vec::new()),
        }
    }

    fn advancing_after(clock: ManualClock, sleeps: usize) -> Self {
        Self {
            clock,
            advance_after: Some(sleeps),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    fn count(&self) -> usize {
        self.sleeps.lock().unwrap().len()
    }
}

impl Sleep for RecordingSleep {
    fn sleep(&self, dur: Duration) {
        let mut sleeps = self.sleeps.lock().unwrap();
        sleeps.push(dur);
        if Some(sleeps.len()) == self.advance_after {
            let now = self.clock.current_millis();
            self.clock.set(now + 1);
        }
    }
}

trait IdGenStatusExt {
    fn unwrap_ready(self) -> SnowflakeId;
    fn unwrap_pending(self) -> (i64, i64);
}

impl IdGenStatusExt for IdGenStatus {
    fn unwrap_ready(self) -> SnowflakeId {
        match self {
            Self::Ready { id } => id,
            Self::Pending { last_timestamp, now } => {
                panic!("unexpected pending (last: {last_timestamp}, now: {now})")
            }
        }
    }

    fn unwrap_pending(self) -> (i64, i64) {
        match self {
            Self::Ready { id } => panic!("unexpected ready ({id})"),
            Self::Pending { last_timestamp, now } => (last_timestamp, now),
        }
    }
}

/// A layout with a 2-bit sequence so exhaustion takes four IDs.
fn tiny_layout() -> Layout {
    Layout::new(41, 10, 2).unwrap()
}

#[test]
fn sequence_increments_within_same_tick() {
    let clock = ManualClock::at(42);
    let generator = LockSnowflakeGenerator::new(NodeIdentity::new(1), Layout::default(), clock);
    let layout = generator.layout();

    let ids: Vec<_> = (0..3).map(|_| generator.generate().unwrap()).collect();
    for (expected, id) in ids.iter().enumerate() {
        assert_eq!(layout.timestamp(*id), 42);
        assert_eq!(layout.node(*id), 1);
        assert_eq!(layout.sequence(*id), expected as u64);
    }
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn sequence_resets_when_clock_advances() {
    let clock = ManualClock::at(10);
    let generator =
        LockSnowflakeGenerator::new(NodeIdentity::new(1), Layout::default(), clock.clone());
    let layout = generator.layout();

    generator.generate().unwrap();
    generator.generate().unwrap();
    clock.set(11);
    let id = generator.generate().unwrap();
    assert_eq!(layout.timestamp(id), 11);
    assert_eq!(layout.sequence(id), 0);
}

#[test]
fn first_id_at_epoch_has_sequence_zero() {
    let generator =
        LockSnowflakeGenerator::new(NodeIdentity::new(0), Layout::default(), ManualClock::at(0));
    let id = generator.generate().unwrap();
    assert_eq!(id, SnowflakeId::from_raw(0));
}

#[test]
fn packs_fields_for_node_five_at_one_second() {
    let generator =
        LockSnowflakeGenerator::new(NodeIdentity::new(5), Layout::default(), ManualClock::at(1000));

    let first = generator.generate().unwrap();
    assert_eq!(first.to_raw(), (1000 << 22) | (5 << 12));

    let second = generator.generate().unwrap();
    assert_eq!(second.to_raw(), (1000 << 22) | (5 << 12) | 1);
}

#[test]
fn node_identity_is_masked_to_layout() {
    let generator = LockSnowflakeGenerator::new(
        NodeIdentity::new(1024 + 7),
        Layout::default(),
        ManualClock::at(1),
    );
    assert_eq!(generator.node(), NodeIdentity::new(7));
    let id = generator.generate().unwrap();
    assert_eq!(Layout::default().node(id), 7);
}

#[test]
fn try_poll_reports_pending_when_exhausted() {
    let clock = ManualClock::at(5);
    let generator = LockSnowflakeGenerator::new(NodeIdentity::new(2), tiny_layout(), clock.clone());

    for seq in 0..=3 {
        let id = generator.try_poll().unwrap().unwrap_ready();
        assert_eq!(tiny_layout().sequence(id), seq);
    }
    assert_eq!(generator.try_poll().unwrap().unwrap_pending(), (5, 5));

    clock.set(6);
    let id = generator.try_poll().unwrap().unwrap_ready();
    assert_eq!(tiny_layout().timestamp(id), 6);
    assert_eq!(tiny_layout().sequence(id), 0);
}

#[test]
fn exhaustion_waits_for_clock_to_advance() {
    let clock = ManualClock::at(100);
    let sleeper = Arc::new(RecordingSleep::advancing_after(clock.clone(), 2));
    let generator = LockSnowflakeGenerator::new(NodeIdentity::new(3), tiny_layout(), clock.clone())
        .with_recovery(ClockRecovery::new(Duration::from_millis(1), 3))
        .with_sleeper(Arc::clone(&sleeper));

    for _ in 0..4 {
        generator.generate().unwrap();
    }
    let id = generator.generate().unwrap();
    assert_eq!(sleeper.count(), 2);
    assert_eq!(tiny_layout().timestamp(id), 101);
    assert_eq!(tiny_layout().sequence(id), 0);
}

#[test]
fn exhaustion_fails_after_bounded_attempts() {
    let clock = ManualClock::at(100);
    let sleeper = Arc::new(RecordingSleep::never_advancing(clock.clone()));
    let generator = LockSnowflakeGenerator::new(NodeIdentity::new(3), tiny_layout(), clock.clone())
        .with_recovery(ClockRecovery::new(Duration::from_millis(7), 3))
        .with_sleeper(Arc::clone(&sleeper));

    let issued: Vec<_> = (0..4).map(|_| generator.generate().unwrap()).collect();
    let err = generator.generate().unwrap_err();
    assert!(matches!(
        err,
        Error::ClockRegression {
            last_timestamp: 100,
            now: 100,
            attempts: 3
        }
    ));
    assert_eq!(sleeper.count(), 3);
    assert!(
        sleeper
            .sleeps
            .lock()
            .unwrap()
            .iter()
            .all(|d| *d == Duration::from_millis(7))
    );

    // A failed call must not hand out a sequence value twice.
    assert!(generator.generate().is_err());

    clock.set(101);
    let next = generator.generate().unwrap();
    assert!(issued.iter().all(|id| *id < next));
}

#[test]
fn backwards_clock_keeps_ids_increasing() {
    let clock = ManualClock::at(500);
    let generator =
        LockSnowflakeGenerator::new(NodeIdentity::new(9), Layout::default(), clock.clone());
    let layout = generator.layout();

    let before = generator.generate().unwrap();
    clock.set(400);
    let during = generator.generate().unwrap();
    assert!(during > before);
    assert_eq!(layout.timestamp(during), 500);
    assert_eq!(layout.sequence(during), 1);

    clock.set(501);
    let after = generator.generate().unwrap();
    assert!(after > during);
    assert_eq!(layout.sequence(after), 0);
}

#[test]
fn clock_past_timestamp_field_is_rejected() {
    let layout = Layout::new(32, 10, 12).unwrap();
    let clock = ManualClock::at(100);
    let generator = LockSnowflakeGenerator::new(NodeIdentity::new(1), layout, clock.clone());

    let first = generator.generate().unwrap();
    assert_eq!(layout.timestamp(first), 100);

    // 100 + 2^32 would wrap back onto the first ID's timestamp.
    clock.set(100 + (1 << 32));
    let err = generator.generate().unwrap_err();
    assert!(matches!(
        err,
        Error::TimestampOutOfRange {
            now,
            max
        } if now == 100 + (1 << 32) && max == u32::MAX as i64
    ));
    assert!(matches!(
        generator.try_poll(),
        Err(Error::TimestampOutOfRange { .. })
    ));

    clock.set(101);
    let next = generator.generate().unwrap();
    assert!(next > first);
}

#[test]
fn clock_before_epoch_is_rejected() {
    let clock = ManualClock::at(-5);
    let generator =
        LockSnowflakeGenerator::new(NodeIdentity::new(1), Layout::default(), clock.clone());
    assert!(matches!(
        generator.generate(),
        Err(Error::TimestampOutOfRange { now: -5, .. })
    ));

    clock.set(0);
    assert_eq!(generator.generate().unwrap(), SnowflakeId::from_raw(1 << 12));
}

#[test]
fn clock_leaving_range_during_wait_is_rejected() {
    let layout = Layout::new(4, 10, 2).unwrap();
    let clock = ManualClock::at(15);
    let sleeper = Arc::new(RecordingSleep::advancing_after(clock.clone(), 1));
    let generator = LockSnowflakeGenerator::new(NodeIdentity::new(0), layout, clock.clone())
        .with_recovery(ClockRecovery::new(Duration::ZERO, 3))
        .with_sleeper(Arc::clone(&sleeper));

    for _ in 0..4 {
        generator.generate().unwrap();
    }
    assert!(matches!(
        generator.generate(),
        Err(Error::TimestampOutOfRange { now: 16, max: 15 })
    ));
    assert_eq!(sleeper.count(), 1);
}

#[test]
fn from_components_resumes_state() {
    let generator = LockSnowflakeGenerator::from_components(
        77,
        3,
        NodeIdentity::new(1),
        tiny_layout(),
        ManualClock::at(77),
        RecordingSleep::never_advancing(ManualClock::default()),
    )
    .with_recovery(ClockRecovery::new(Duration::ZERO, 1));

    assert!(matches!(
        generator.try_poll().unwrap(),
        IdGenStatus::Pending {
            last_timestamp: 77,
            ..
        }
    ));
}

#[test]
fn default_recovery_waits_three_seconds() {
    let recovery = ClockRecovery::default();
    assert_eq!(recovery.interval, Duration::from_secs(1));
    assert_eq!(recovery.attempts, 3);
    assert_eq!(recovery.max_wait(), Duration::from_secs(3));
}

fn generate_through_trait<G: SnowflakeGenerator>(generator: &G) -> SnowflakeId {
    generator.generate().unwrap()
}

#[test]
fn usable_through_trait_object_bound() {
    let generator =
        LockSnowflakeGenerator::new(NodeIdentity::new(4), Layout::default(), ManualClock::at(9));
    let a = generate_through_trait(&generator);
    let b = generate_through_trait(&generator);
    assert!(a < b);
}

#[test]
fn threads_never_share_an_id() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 2_000;

    let clock = ManualClock::at(1);
    let sleeper = Arc::new(RecordingSleep::never_advancing(clock.clone()));
    let generator = LockSnowflakeGenerator::new(NodeIdentity::new(11), Layout::default(), clock.clone())
        .with_recovery(ClockRecovery::new(Duration::ZERO, 1))
        .with_sleeper(Arc::clone(&sleeper));
    let ticker = AtomicI64::new(1);

    let seen = Mutex::new(HashSet::with_capacity(THREADS * PER_THREAD));
    scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                let mut local = Vec::with_capacity(PER_THREAD);
                while local.len() < PER_THREAD {
                    match generator.generate() {
                        Ok(id) => local.push(id),
                        Err(Error::ClockRegression { .. }) => {
                            clock.set(ticker.fetch_add(1, Ordering::SeqCst) + 1);
                        }
                        Err(e) => panic!("unexpected error: {e}"),
                    }
                }
                let mut seen = seen.lock().unwrap();
                for id in local {
                    assert!(seen.insert(id), "duplicate ID {id}");
                }
            });
        }
    });
    assert_eq!(seen.lock().unwrap().len(), THREADS * PER_THREAD);
}
