use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{
    CheckoutCompletedEvent,
    EventHandler,
    EventProducer,
    Handler,
    SubOrderConfirmedEvent,
    SubOrderFailedEvent,
};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub sub_order_confirmed_producer: Vec<EventProducer<SubOrderConfirmedEvent>>,
    pub sub_order_failed_producer: Vec<EventProducer<SubOrderFailedEvent>>,
    pub checkout_completed_producer: Vec<EventProducer<CheckoutCompletedEvent>>,
}

pub struct EventHandlers {
    pub on_sub_order_confirmed: Option<EventHandler<SubOrderConfirmedEvent>>,
    pub on_sub_order_failed: Option<EventHandler<SubOrderFailedEvent>>,
    pub on_checkout_completed: Option<EventHandler<CheckoutCompletedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_sub_order_confirmed = hooks.on_sub_order_confirmed.map(|f| EventHandler::new(buffer_size, f));
        let on_sub_order_failed = hooks.on_sub_order_failed.map(|f| EventHandler::new(buffer_size, f));
        let on_checkout_completed = hooks.on_checkout_completed.map(|f| EventHandler::new(buffer_size, f));
        Self { on_sub_order_confirmed, on_sub_order_failed, on_checkout_completed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_sub_order_confirmed {
            result.sub_order_confirmed_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_sub_order_failed {
            result.sub_order_failed_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_checkout_completed {
            result.checkout_completed_producer.push(handler.subscribe());
        }
        result
    }

    /// Spawns every handler loop. Each loop ends once all of its producers have been dropped.
    pub fn start_handlers(self) -> Vec<tokio::task::JoinHandle<()>> {
        let mut tasks = Vec::new();
        if let Some(handler) = self.on_sub_order_confirmed {
            tasks.push(tokio::spawn(handler.start_handler()));
        }
        if let Some(handler) = self.on_sub_order_failed {
            tasks.push(tokio::spawn(handler.start_handler()));
        }
        if let Some(handler) = self.on_checkout_completed {
            tasks.push(tokio::spawn(handler.start_handler()));
        }
        tasks
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_sub_order_confirmed: Option<Handler<SubOrderConfirmedEvent>>,
    pub on_sub_order_failed: Option<Handler<SubOrderFailedEvent>>,
    pub on_checkout_completed: Option<Handler<CheckoutCompletedEvent>>,
}

impl EventHooks {
    pub fn on_sub_order_confirmed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(SubOrderConfirmedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_sub_order_confirmed = Some(Arc::new(f));
        self
    }

    pub fn on_sub_order_failed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(SubOrderFailedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_sub_order_failed = Some(Arc::new(f));
        self
    }

    pub fn on_checkout_completed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(CheckoutCompletedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_checkout_completed = Some(Arc::new(f));
        self
    }
}
