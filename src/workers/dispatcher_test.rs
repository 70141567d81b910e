//! Tests for request admission.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::cache::{PageCache, Storage};
    use crate::time;
    use crate::workers::{Admission, Dispatcher, Lanes, Priority};

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn dispatcher() -> (Dispatcher, Arc<PageCache>, Arc<Lanes>) {
        let cache = Arc::new(PageCache::new(DAY, 4));
        let lanes = Arc::new(Lanes::new());
        (Dispatcher::new(cache.clone(), lanes.clone()), cache, lanes)
    }

    #[test]
    fn test_fresh_entry_is_returned_without_queueing() {
        let (dispatcher, cache, lanes) = dispatcher();
        cache.store("http://a.com/", Bytes::from_static(b"A"));

        let got = dispatcher.submit("http://a.com/", 3, true);
        assert_eq!(got, Admission::Hit(Bytes::from_static(b"A")));
        assert_eq!(lanes.depth(), (0, 0));
    }

    #[test]
    fn test_hit_touches_entry() {
        let (dispatcher, cache, _) = dispatcher();
        cache.store("k", Bytes::from_static(b"v"));
        let old = time::unix_nano() - (DAY / 2).as_nanos() as i64;
        cache.set_last_served_for_tests("k", old);

        assert!(matches!(dispatcher.submit("k", 0, false), Admission::Hit(_)));
        assert!(cache.last_served("k").unwrap() > old);
    }

    #[test]
    fn test_miss_is_queued_on_lane_by_paying_flag() {
        let (dispatcher, _, lanes) = dispatcher();

        assert_eq!(dispatcher.submit("p", 0, true), Admission::Queued(Priority::High));
        assert_eq!(dispatcher.submit("f", 0, false), Admission::Queued(Priority::Low));
        assert_eq!(lanes.depth(), (1, 1));
    }

    #[test]
    fn test_stale_entry_is_queued_again() {
        let (dispatcher, cache, lanes) = dispatcher();
        cache.store("k", Bytes::from_static(b"old"));
        cache.set_last_served_for_tests("k", time::unix_nano() - DAY.as_nanos() as i64);

        assert_eq!(dispatcher.submit("k", 1, false), Admission::Queued(Priority::Low));
        assert_eq!(lanes.depth(), (0, 1));
    }

    #[test]
    fn test_retry_limit_is_clamped_on_admission() {
        let (dispatcher, _, lanes) = dispatcher();
        dispatcher.submit("hi", 42, true);
        dispatcher.submit("lo", -1, false);

        assert_eq!(lanes.try_pop().unwrap().retry_limit(), 10);
        assert_eq!(lanes.try_pop().unwrap().retry_limit(), 0);
    }

    #[test]
    fn test_duplicate_misses_are_all_queued() {
        let (dispatcher, _, lanes) = dispatcher();
        for _ in 0..3 {
            dispatcher.submit("same", 0, false);
        }
        assert_eq!(lanes.depth(), (0, 3));
    }

    #[test]
    fn test_closed_lanes_report_shutdown() {
        let (dispatcher, _, lanes) = dispatcher();
        lanes.close();
        assert_eq!(dispatcher.submit("k", 0, true), Admission::ShuttingDown);
    }
}
