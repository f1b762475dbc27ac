use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use log::trace;

use super::EventHandler;

pub type Callback<T> = Rc<dyn Fn(&T)>;
pub type SubscriptionId = u64;

/// Sending half of a [`Channel`].
pub struct EventEmitter<T: std::fmt::Debug> {
    channel: Channel<T>,
}

impl<T: std::fmt::Debug> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

/// Subscribing half of a [`Channel`].
pub struct EventObserver<T: std::fmt::Debug> {
    channel: Channel<T>,
}

impl<T: std::fmt::Debug> Clone for EventObserver<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

/// Single-threaded broadcast channel. Listeners run synchronously, in subscription
/// order, on the emitting call stack.
pub struct Channel<T: std::fmt::Debug> {
    listeners: Rc<RefCell<BTreeMap<SubscriptionId, Callback<T>>>>,
    next_id: Rc<Cell<SubscriptionId>>,
}

impl<T: std::fmt::Debug> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
            next_id: Rc::clone(&self.next_id),
        }
    }
}

impl<T: std::fmt::Debug + 'static> Channel<T> {
    pub fn new() -> (EventEmitter<T>, EventObserver<T>) {
        let channel = Channel {
            listeners: Rc::new(RefCell::new(BTreeMap::new())),
            next_id: Rc::new(Cell::new(0)),
        };
        (
            EventEmitter {
                channel: channel.clone(),
            },
            EventObserver { channel },
        )
    }

    fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().insert(id, Rc::new(callback));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().remove(&id).is_some()
    }

    fn emit(&self, data: &T) {
        // snapshot so listeners may (un)subscribe while being called
        let listeners: Vec<Callback<T>> = self.listeners.borrow().values().cloned().collect();
        trace!(target: "events", "Emitting event to {} listeners: {:?}", listeners.len(), data);
        for listener in listeners {
            listener(data);
        }
    }
}

impl<T: std::fmt::Debug + 'static> EventEmitter<T> {
    pub fn emit(&self, data: &T) {
        self.channel.emit(data);
    }
}

impl<T: std::fmt::Debug + 'static> EventObserver<T> {
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        self.channel.subscribe(callback)
    }

    /// Routes every event to a shared handler.
    pub fn subscribe_handler<H>(&self, handler: Rc<RefCell<H>>) -> SubscriptionId
    where
        H: EventHandler<T> + 'static,
    {
        self.channel.subscribe(move |event| {
            handler.borrow_mut().handle_event(event);
        })
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.channel.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnalyticsEvent;

    #[derive(Default)]
    struct Recorder {
        events: Vec<AnalyticsEvent>,
    }

    impl EventHandler<AnalyticsEvent> for Recorder {
        fn handle_event(&mut self, event: &AnalyticsEvent) {
            self.events.push(event.clone());
        }
    }

    #[test]
    fn test_every_listener_sees_each_event() {
        let (emitter, observer) = Channel::<AnalyticsEvent>::new();
        let counter = Rc::new(Cell::new(0));
        for _ in 0..2 {
            let counter = counter.clone();
            observer.subscribe(move |_| counter.set(counter.get() + 1));
        }

        emitter.emit(&AnalyticsEvent::FilmsShuffled);
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_handler_subscription_records_events() {
        let (emitter, observer) = Channel::<AnalyticsEvent>::new();
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        observer.subscribe_handler(recorder.clone());

        emitter.clone().emit(&AnalyticsEvent::FilmsShuffled);
        emitter.emit(&AnalyticsEvent::GameWon {
            mistakes: 1,
            groups: 4,
        });

        assert_eq!(recorder.borrow().events.len(), 2);
        assert_eq!(recorder.borrow().events[0], AnalyticsEvent::FilmsShuffled);
    }

    #[test]
    fn test_unsubscribe() {
        let (emitter, observer) = Channel::<AnalyticsEvent>::new();
        let counter = Rc::new(Cell::new(0));
        let counter_clone = counter.clone();

        let sub_id = observer.subscribe(move |_| {
            counter_clone.set(counter_clone.get() + 1);
        });

        emitter.emit(&AnalyticsEvent::FilmsShuffled);
        assert_eq!(counter.get(), 1);

        assert!(observer.unsubscribe(sub_id));
        emitter.emit(&AnalyticsEvent::FilmsShuffled);
        assert_eq!(counter.get(), 1);

        assert!(!observer.unsubscribe(sub_id));
    }

    #[test]
    fn test_listener_can_subscribe_during_emit() {
        let (emitter, observer) = Channel::<AnalyticsEvent>::new();
        let inner_observer = observer.clone();
        observer.subscribe(move |_| {
            inner_observer.subscribe(|_| {});
        });

        emitter.emit(&AnalyticsEvent::FilmsShuffled);
        emitter.emit(&AnalyticsEvent::FilmsShuffled);
    }
}
