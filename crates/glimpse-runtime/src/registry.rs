#![forbid(unsafe_code)]

//! Process-wide map of device id → coordinator handle.
//!
//! Devices get an explicit lifecycle: a coordinator is created when a
//! device is set up and torn down when the device is removed. Nothing
//! lives in module-level state.

use std::collections::HashMap;

use glimpse_core::data::EntityId;
use parking_lot::Mutex;

use crate::coordinator::{CoordinatorHandle, CoordinatorState, Trigger};

/// Owns every running coordinator.
#[derive(Debug, Default)]
pub struct CoordinatorRegistry {
    coordinators: Mutex<HashMap<String, CoordinatorHandle>>,
}

impl CoordinatorRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device's coordinator. Returns the previous handle if
    /// the device id was already registered; the caller should shut it
    /// down.
    pub fn register(&self, handle: CoordinatorHandle) -> Option<CoordinatorHandle> {
        let mut map = self.coordinators.lock();
        let replaced = map.insert(handle.device_id().to_string(), handle);
        if replaced.is_some() {
            tracing::warn!("replacing an already-registered coordinator");
        }
        replaced
    }

    /// Remove a device's coordinator for teardown. The caller awaits
    /// [`CoordinatorHandle::shutdown`] on the returned handle.
    #[must_use]
    pub fn remove(&self, device_id: &str) -> Option<CoordinatorHandle> {
        self.coordinators.lock().remove(device_id)
    }

    /// Whether a device is registered.
    #[must_use]
    pub fn contains(&self, device_id: &str) -> bool {
        self.coordinators.lock().contains_key(device_id)
    }

    /// Registered device ids.
    #[must_use]
    pub fn device_ids(&self) -> Vec<String> {
        self.coordinators.lock().keys().cloned().collect()
    }

    /// Current state of one device's coordinator.
    #[must_use]
    pub fn state_of(&self, device_id: &str) -> Option<CoordinatorState> {
        self.coordinators.lock().get(device_id).map(|h| h.state())
    }

    /// Send a trigger to one device.
    pub fn trigger(&self, device_id: &str, trigger: Trigger) -> bool {
        match self.coordinators.lock().get(device_id) {
            Some(handle) => {
                handle.trigger(trigger);
                true
            }
            None => false,
        }
    }

    /// Fan a data-change event out to every coordinator; each filters
    /// against its own dependency set.
    pub fn data_changed(&self, id: &EntityId) {
        for handle in self.coordinators.lock().values() {
            handle.trigger(Trigger::DataChanged(id.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use glimpse_core::config::Screen;
    use glimpse_core::data::{DataSource, StaticData};
    use glimpse_device::{DeviceError, DisplayTarget};

    use crate::coordinator::CoordinatorConfig;
    use crate::error::RuntimeError;
    use crate::pipeline::CycleReport;

    #[derive(Default)]
    struct CountingPipeline {
        renders: AtomicU32,
    }

    impl crate::coordinator::RenderPipeline for CountingPipeline {
        fn render(
            &self,
            _screen: &Screen,
            _data: &dyn DataSource,
        ) -> Result<(Vec<u8>, CycleReport), RuntimeError> {
            self.renders.fetch_add(1, Ordering::SeqCst);
            Ok((vec![0xFF, 0xD8], CycleReport::default()))
        }
    }

    struct NullTarget;

    #[async_trait]
    impl DisplayTarget for NullTarget {
        async fn push_frame(&self, _jpeg: &[u8], _filename: &str) -> Result<(), DeviceError> {
            Ok(())
        }
        async fn set_brightness(&self, _percent: u8) -> Result<(), DeviceError> {
            Ok(())
        }
    }

    fn spawn_handle(device_id: &str) -> (CoordinatorHandle, Arc<CountingPipeline>) {
        let pipeline = Arc::new(CountingPipeline::default());
        let handle = CoordinatorHandle::spawn(
            device_id,
            Screen::with_default_widgets(device_id),
            pipeline.clone(),
            Arc::new(NullTarget),
            Arc::new(StaticData::new()),
            CoordinatorConfig {
                refresh_interval: None,
                debounce: Duration::from_millis(100),
                ..CoordinatorConfig::default()
            },
        );
        (handle, pipeline)
    }

    #[tokio::test(start_paused = true)]
    async fn lifecycle_register_and_teardown() {
        let registry = CoordinatorRegistry::new();
        let (handle, _) = spawn_handle("bedroom");
        assert!(registry.register(handle).is_none());
        assert!(registry.contains("bedroom"));
        assert_eq!(registry.device_ids(), vec!["bedroom".to_string()]);

        let handle = registry.remove("bedroom").unwrap();
        handle.shutdown().await;
        assert!(!registry.contains("bedroom"));
    }

    #[tokio::test(start_paused = true)]
    async fn replacing_a_device_returns_the_old_handle() {
        let registry = CoordinatorRegistry::new();
        let (first, _) = spawn_handle("kitchen");
        let (second, _) = spawn_handle("kitchen");
        assert!(registry.register(first).is_none());
        let old = registry.register(second).unwrap();
        old.shutdown().await;
        assert!(registry.contains("kitchen"));
        registry.remove("kitchen").unwrap().shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn trigger_reaches_the_right_device() {
        let registry = CoordinatorRegistry::new();
        let (a, pipeline_a) = spawn_handle("a");
        let (b, pipeline_b) = spawn_handle("b");
        registry.register(a);
        registry.register(b);
        tokio::time::sleep(Duration::from_secs(1)).await;
        let before_a = pipeline_a.renders.load(Ordering::SeqCst);
        let before_b = pipeline_b.renders.load(Ordering::SeqCst);

        assert!(registry.trigger("a", Trigger::Refresh));
        assert!(!registry.trigger("missing", Trigger::Refresh));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(pipeline_a.renders.load(Ordering::SeqCst), before_a + 1);
        assert_eq!(pipeline_b.renders.load(Ordering::SeqCst), before_b);

        for id in registry.device_ids() {
            registry.remove(&id).unwrap().shutdown().await;
        }
    }
}
