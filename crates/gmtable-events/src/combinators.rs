//! Tap combinators.
//!
//! Both combinators install a relay handler on the source that lives as long
//! as the source keeps it. There is no way to unwire a relay.

use crate::tap::{ListenableTap, RaisableTap, handler};

/// Relays every event raised on `source` to `destination`, unchanged.
pub fn forward<T, S, D>(source: &S, destination: D)
where
    T: 'static,
    S: ListenableTap<T> + ?Sized,
    D: RaisableTap<T> + Send + Sync + 'static,
{
    source.listen(&handler(move |payload: &T| destination.raise(payload)));
}

/// Relays every event raised on `source` to `destination` after passing it
/// through `transform`.
///
/// `transform` is expected to be a pure function of its input.
pub fn map<A, B, S, D, F>(source: &S, destination: D, transform: F)
where
    A: 'static,
    S: ListenableTap<A> + ?Sized,
    D: RaisableTap<B> + Send + Sync + 'static,
    F: Fn(&A) -> B + Send + Sync + 'static,
{
    source.listen(&handler(move |payload: &A| {
        destination.raise(&transform(payload));
    }));
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::tap::{NullTap, Tap};

    fn recorder<T: Clone + Send + 'static>(tap: &Tap<T>) -> Arc<Mutex<Vec<T>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        tap.listen(&handler(move |v: &T| sink.lock().unwrap().push(v.clone())));
        seen
    }

    #[test]
    fn test_forward_relays_each_payload_once() {
        // Arrange
        let source = Tap::new();
        let destination = Arc::new(Tap::new());
        let seen = recorder(&destination);
        forward(&source, Arc::clone(&destination));

        // Act
        source.raise(&"alpha".to_owned());
        source.raise(&"beta".to_owned());

        // Assert
        assert_eq!(*seen.lock().unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_forward_only_relays_events_raised_after_wiring() {
        let source = Tap::new();
        let destination = Arc::new(Tap::new());
        let seen = recorder(&destination);

        source.raise(&1_u32);
        forward(&source, Arc::clone(&destination));
        source.raise(&2_u32);

        assert_eq!(*seen.lock().unwrap(), vec![2]);
    }

    #[test]
    fn test_forward_to_null_tap_is_accepted() {
        let source = Tap::new();
        forward(&source, NullTap);

        source.raise(&1_u32);

        assert_eq!(source.handler_count(), 1);
    }

    #[test]
    fn test_map_relays_transformed_payload() {
        // Arrange
        let source = Tap::new();
        let destination = Arc::new(Tap::new());
        let seen = recorder(&destination);
        map(&source, Arc::clone(&destination), |v: &u32| v * 10);

        // Act
        source.raise(&4);
        source.raise(&5);

        // Assert
        assert_eq!(*seen.lock().unwrap(), vec![40, 50]);
    }

    #[test]
    fn test_map_invokes_transform_once_per_event() {
        // Arrange
        let source = Tap::new();
        let destination = Arc::new(Tap::new());
        let calls = Arc::new(Mutex::new(0_u32));
        let counted = Arc::clone(&calls);
        map(&source, Arc::clone(&destination), move |v: &u32| {
            *counted.lock().unwrap() += 1;
            v.to_string()
        });
        let seen = recorder(&destination);

        // Act
        source.raise(&3);

        // Assert
        assert_eq!(*calls.lock().unwrap(), 1);
        assert_eq!(*seen.lock().unwrap(), vec!["3"]);
    }

    #[test]
    fn test_map_accepts_listen_only_view_of_source() {
        let source: Tap<u32> = Tap::new();
        let destination = Arc::new(Tap::new());
        let seen = recorder(&destination);
        let view: &dyn ListenableTap<u32> = &source;

        map(view, Arc::clone(&destination), |v: &u32| u64::from(*v) + 1);
        source.raise(&1);

        assert_eq!(*seen.lock().unwrap(), vec![2_u64]);
    }
}
