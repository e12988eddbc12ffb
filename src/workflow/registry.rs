use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::instance::WorkflowInstance;
use crate::error::EngineError;

/// Exclusive owner of the application id → instance mapping.
///
/// Entries are created once per application and never reused; archived
/// instances stay in the map and remain queryable. Removal is the calling
/// service's concern, not the engine's.
#[derive(Debug, Default)]
pub struct WorkflowRegistry {
    inner: Mutex<HashMap<String, Arc<WorkflowInstance>>>,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly created instance under its application id.
    pub fn insert(&self, instance: Arc<WorkflowInstance>) -> Result<(), EngineError> {
        let mut map = self.lock();
        let id = instance.application_id().to_string();
        if map.contains_key(&id) {
            return Err(EngineError::DuplicateWorkflow(id));
        }
        map.insert(id, instance);
        Ok(())
    }

    pub fn get(&self, application_id: &str) -> Option<Arc<WorkflowInstance>> {
        self.lock().get(application_id).cloned()
    }

    /// Best-effort snapshot of all instances, oldest first. Consistency
    /// across concurrent mutation is not promised; torn reads are.
    pub fn snapshot(&self) -> Vec<Arc<WorkflowInstance>> {
        let mut instances: Vec<_> = self.lock().values().cloned().collect();
        instances.sort_by_key(|wf| wf.created_at());
        instances
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<WorkflowInstance>>> {
        self.inner.lock().expect("registry lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn instance(id: &str, created_offset_hours: i64) -> Arc<WorkflowInstance> {
        let t0 = Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0).unwrap()
            + Duration::hours(created_offset_hours);
        Arc::new(WorkflowInstance::new(
            id.into(),
            "ActiveCorp".into(),
            "Frontend Developer".into(),
            t0 + Duration::days(5),
            t0,
        ))
    }

    #[test]
    fn insert_then_get() {
        let registry = WorkflowRegistry::new();
        registry.insert(instance("1", 0)).unwrap();

        assert!(registry.get("1").is_some());
        assert!(registry.get("2").is_none());
        assert_eq!(registry.snapshot().len(), 1);
    }

    #[test]
    fn duplicate_id_rejected_and_first_untouched() {
        let registry = WorkflowRegistry::new();
        let first = instance("1", 0);
        let first_workflow_id = first.workflow_id().to_string();
        registry.insert(first).unwrap();

        let err = registry.insert(instance("1", 1)).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateWorkflow(id) if id == "1"));

        // The original entry survived the rejected insert.
        let kept = registry.get("1").unwrap();
        assert_eq!(kept.workflow_id(), first_workflow_id);
        assert_eq!(registry.snapshot().len(), 1);
    }

    #[test]
    fn snapshot_is_ordered_by_creation() {
        let registry = WorkflowRegistry::new();
        registry.insert(instance("b", 2)).unwrap();
        registry.insert(instance("a", 0)).unwrap();
        registry.insert(instance("c", 1)).unwrap();

        let ids: Vec<_> = registry
            .snapshot()
            .iter()
            .map(|wf| wf.application_id().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn empty_registry_has_empty_snapshot() {
        let registry = WorkflowRegistry::new();
        assert!(registry.snapshot().is_empty());
        assert!(registry.get("anything").is_none());
    }
}
