//! Typed in-process publish/subscribe channel connecting decoupled shell
//! pieces.
//!
//! Desktop icons, taskbar, terminal, and overview screens request
//! window-manager actions and receive state notifications through this bus
//! without holding references to each other. Delivery is synchronous, in
//! subscription order, on the single UI thread.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use shell_app_contract::AppId;

use crate::model::WindowId;
use crate::shell::FolderCreationResult;
use crate::views::StateSnapshot;

/// Bus topics. Command topics flow into the shell; notification topics
/// flow out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    LaunchApp,
    FocusWindow,
    CloseWindow,
    RestoreMinimized,
    CreateFolder,
    WindowStateChanged,
    FolderCreationResult,
}

/// Events carried on the bus.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    LaunchApp { app_id: AppId },
    FocusWindow { window_id: WindowId },
    CloseWindow { window_id: WindowId },
    RestoreMinimized { app_id: AppId },
    CreateFolder { name: String, correlation_id: u64 },
    WindowStateChanged { snapshot: StateSnapshot },
    FolderCreationResult { result: FolderCreationResult },
}

impl ShellEvent {
    pub fn topic(&self) -> Topic {
        match self {
            Self::LaunchApp { .. } => Topic::LaunchApp,
            Self::FocusWindow { .. } => Topic::FocusWindow,
            Self::CloseWindow { .. } => Topic::CloseWindow,
            Self::RestoreMinimized { .. } => Topic::RestoreMinimized,
            Self::CreateFolder { .. } => Topic::CreateFolder,
            Self::WindowStateChanged { .. } => Topic::WindowStateChanged,
            Self::FolderCreationResult { .. } => Topic::FolderCreationResult,
        }
    }
}

type Handler = Rc<dyn Fn(&ShellEvent)>;

struct Subscriber {
    id: u64,
    handler: Handler,
}

#[derive(Default)]
struct BusInner {
    next_subscription: u64,
    topics: HashMap<Topic, Vec<Subscriber>>,
}

/// Single-threaded event dispatcher. Cheap to clone; clones share the same
/// subscriber table.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `topic` and returns a guard that
    /// unsubscribes when dropped, giving subscriptions scoped lifetime.
    #[must_use = "dropping the subscription immediately unsubscribes the handler"]
    pub fn subscribe(&self, topic: Topic, handler: impl Fn(&ShellEvent) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_subscription;
        inner.next_subscription += 1;
        inner.topics.entry(topic).or_default().push(Subscriber {
            id,
            handler: Rc::new(handler),
        });
        Subscription {
            bus: Rc::downgrade(&self.inner),
            topic,
            id,
        }
    }

    /// Delivers `event` to every subscriber of its topic, synchronously and
    /// in subscription order.
    ///
    /// The handler list is snapshotted before delivery so a handler may
    /// publish or (un)subscribe without poisoning the borrow; handlers
    /// added during delivery first hear the next event.
    pub fn publish(&self, event: &ShellEvent) {
        let handlers: Vec<Handler> = {
            let inner = self.inner.borrow();
            inner
                .topics
                .get(&event.topic())
                .map(|subscribers| subscribers.iter().map(|s| s.handler.clone()).collect())
                .unwrap_or_default()
        };
        for handler in handlers {
            handler(event);
        }
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.inner
            .borrow()
            .topics
            .get(&topic)
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }
}

/// Scoped subscription handle; dropping it detaches the handler.
pub struct Subscription {
    bus: Weak<RefCell<BusInner>>,
    topic: Topic,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.bus.upgrade() else {
            return;
        };
        let mut inner = inner.borrow_mut();
        if let Some(subscribers) = inner.topics.get_mut(&self.topic) {
            subscribers.retain(|s| s.id != self.id);
            if subscribers.is_empty() {
                inner.topics.remove(&self.topic);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn delivery_follows_subscription_order() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = {
            let seen = seen.clone();
            bus.subscribe(Topic::LaunchApp, move |_| seen.borrow_mut().push("first"))
        };
        let second = {
            let seen = seen.clone();
            bus.subscribe(Topic::LaunchApp, move |_| seen.borrow_mut().push("second"))
        };

        bus.publish(&ShellEvent::LaunchApp {
            app_id: AppId::from("calculator"),
        });
        assert_eq!(*seen.borrow(), vec!["first", "second"]);
        drop(first);
        drop(second);
    }

    #[test]
    fn dropped_subscription_stops_receiving() {
        let bus = EventBus::new();
        let count = Rc::new(RefCell::new(0u32));

        let subscription = {
            let count = count.clone();
            bus.subscribe(Topic::CloseWindow, move |_| *count.borrow_mut() += 1)
        };
        let event = ShellEvent::CloseWindow {
            window_id: WindowId("calculator-1".to_string()),
        };
        bus.publish(&event);
        drop(subscription);
        bus.publish(&event);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.subscriber_count(Topic::CloseWindow), 0);
    }

    #[test]
    fn topics_are_isolated() {
        let bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0u32));
        let _sub = {
            let hits = hits.clone();
            bus.subscribe(Topic::RestoreMinimized, move |_| *hits.borrow_mut() += 1)
        };

        bus.publish(&ShellEvent::LaunchApp {
            app_id: AppId::from("terminal"),
        });
        assert_eq!(*hits.borrow(), 0);

        bus.publish(&ShellEvent::RestoreMinimized {
            app_id: AppId::from("terminal"),
        });
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn handler_may_publish_without_deadlocking() {
        let bus = EventBus::new();
        let results = Rc::new(RefCell::new(Vec::new()));

        let _relay = {
            let bus = bus.clone();
            bus.clone().subscribe(Topic::CreateFolder, move |event| {
                if let ShellEvent::CreateFolder { correlation_id, .. } = event {
                    bus.publish(&ShellEvent::FolderCreationResult {
                        result: FolderCreationResult::success(*correlation_id, "ok"),
                    });
                }
            })
        };
        let _listener = {
            let results = results.clone();
            bus.subscribe(Topic::FolderCreationResult, move |event| {
                if let ShellEvent::FolderCreationResult { result } = event {
                    results.borrow_mut().push(result.clone());
                }
            })
        };

        bus.publish(&ShellEvent::CreateFolder {
            name: "Notes".to_string(),
            correlation_id: 9,
        });
        assert_eq!(results.borrow().len(), 1);
        assert_eq!(results.borrow()[0].correlation_id, 9);
    }
}
