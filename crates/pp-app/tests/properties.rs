//! Rate-limiting properties of the session, driven with a virtual clock.

mod common;

use common::*;
use pp_app::{Operation, UiEvent};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any burst whose gaps stay inside the debounce delay collapses to one
    /// request carrying the last value.
    #[test]
    fn debounced_burst_sends_last_value(
        steps in prop::collection::vec((0_u64..25, -5.0_f64..5.0), 1..20)
    ) {
        let mut session = ready_session();
        let mut now = 1000;
        for (gap, value) in &steps {
            now += gap;
            session.handle(UiEvent::Parameter { name: "a".to_string(), value: *value }, ms(now));
            session.tick(ms(now));
        }
        prop_assert!(take_requests(&mut session).is_empty());

        session.tick(ms(now + 25));
        let requests = take_requests(&mut session);
        prop_assert_eq!(requests.len(), 1);
        let last = steps.last().map(|(_, v)| *v).unwrap();
        match &requests[0].operation {
            Operation::ParametersChanged { params } => prop_assert_eq!(params["a"], last),
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    /// Clicks closer together than the throttle interval never yield more than
    /// one request per window.
    #[test]
    fn throttled_clicks_respect_interval(gaps in prop::collection::vec(0_u64..200, 1..40)) {
        let mut session = ready_session();
        let mut now = 0;
        let mut last_sent: Option<u64> = None;
        for gap in gaps {
            now += gap;
            session.handle(UiEvent::Click { x: 0.5, y: 0.5 }, ms(now));
            if !take_requests(&mut session).is_empty() {
                if let Some(prev) = last_sent {
                    prop_assert!(now - prev >= 500);
                }
                last_sent = Some(now);
            }
        }
        prop_assert!(last_sent.is_some());
    }
}
