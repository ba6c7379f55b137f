//! Runs service calls off the UI thread and reports completions back.
//!
//! The UI loop stays single-threaded: it hands a [`Request`] to the
//! [`Dispatcher`], which spawns it on the tokio runtime, and later drains
//! [`Completion`]s from the channel. Requests are not serialized, debounced
//! or cancelled.
//!
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::app::page::{Completion, Request};
use crate::model::{FormValues, QueryParams, TableListData};
use crate::service::BookService;

/// Add a record. Any failure is logged and reported as `false`.
pub async fn handle_add(service: &dyn BookService, fields: &FormValues) -> bool {
    match service.create(fields).await {
        Ok(_) => {
            tracing::info!("record added");
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "add failed");
            false
        }
    }
}

/// Update the record identified by `fields.key`.
pub async fn handle_update(service: &dyn BookService, fields: &FormValues) -> bool {
    match service.update(fields).await {
        Ok(_) => {
            tracing::info!(key = ?fields.key, "record updated");
            true
        }
        Err(e) => {
            tracing::warn!(key = ?fields.key, error = %e, "update failed");
            false
        }
    }
}

/// Remove the given keys. An empty set succeeds without touching the service.
pub async fn handle_remove(service: &dyn BookService, keys: &[u64]) -> bool {
    if keys.is_empty() {
        return true;
    }
    match service.remove(keys).await {
        Ok(_) => {
            tracing::info!(count = keys.len(), "records removed");
            true
        }
        Err(e) => {
            tracing::warn!(?keys, error = %e, "remove failed");
            false
        }
    }
}

/// Fetch one page; `None` on failure.
pub async fn handle_list(service: &dyn BookService, params: &QueryParams) -> Option<TableListData> {
    match service.fetch_list(params).await {
        Ok(data) => {
            tracing::info!(rows = data.list.len(), total = ?data.pagination.total, "page loaded");
            Some(data)
        }
        Err(e) => {
            tracing::warn!(error = %e, "list failed");
            None
        }
    }
}

/// Run one request to completion.
pub async fn execute(service: &dyn BookService, request: Request) -> Completion {
    match request {
        Request::List { seq, params } => Completion::Listed {
            seq,
            data: handle_list(service, &params).await,
        },
        Request::Add { toast, fields } => Completion::Added {
            toast,
            ok: handle_add(service, &fields).await,
        },
        Request::Update { toast, fields } => Completion::Updated {
            toast,
            ok: handle_update(service, &fields).await,
        },
        Request::Remove { toast, keys } => Completion::Removed {
            toast,
            ok: handle_remove(service, &keys).await,
        },
    }
}

pub struct Dispatcher {
    handle: Handle,
    service: Arc<dyn BookService>,
    tx: UnboundedSender<Completion>,
}

impl Dispatcher {
    pub fn new(handle: Handle, service: Arc<dyn BookService>) -> (Self, UnboundedReceiver<Completion>) {
        let (tx, rx) = unbounded_channel();
        (Self { handle, service, tx }, rx)
    }

    pub fn dispatch(&self, request: Request) {
        tracing::debug!(?request, "dispatch");
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let completion = execute(service.as_ref(), request).await;
            // The receiver is gone only when the UI has exited.
            let _ = tx.send(completion);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::toast::Toasts;
    use crate::error::ServiceError;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        fail: bool,
        removed: Mutex<Vec<Vec<u64>>>,
    }

    #[async_trait]
    impl BookService for Recorder {
        async fn fetch_list(&self, _: &QueryParams) -> Result<TableListData, ServiceError> {
            if self.fail {
                return Err(ServiceError::Status { status: 502, body: String::new() });
            }
            Ok(TableListData::default())
        }
        async fn create(&self, _: &FormValues) -> Result<Value, ServiceError> {
            Ok(Value::Null)
        }
        async fn update(&self, _: &FormValues) -> Result<Value, ServiceError> {
            Ok(Value::Null)
        }
        async fn remove(&self, keys: &[u64]) -> Result<Value, ServiceError> {
            self.removed.lock().unwrap().push(keys.to_vec());
            if self.fail {
                return Err(ServiceError::Status { status: 500, body: String::new() });
            }
            Ok(Value::Null)
        }
    }

    #[tokio::test]
    async fn empty_remove_skips_service() {
        let svc = Recorder::default();
        assert!(handle_remove(&svc, &[]).await);
        assert!(svc.removed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failures_collapse_to_false() {
        let svc = Recorder { fail: true, ..Default::default() };
        assert!(!handle_remove(&svc, &[1, 2]).await);
        assert!(handle_list(&svc, &QueryParams::default()).await.is_none());
    }

    #[tokio::test]
    async fn dispatcher_delivers_completion() {
        let svc: Arc<dyn BookService> = Arc::new(Recorder::default());
        let (dispatcher, mut rx) = Dispatcher::new(Handle::current(), svc);
        let toast = Toasts::new().loading("Deleting");
        dispatcher.dispatch(Request::Remove { toast, keys: vec![3] });
        let done = rx.recv().await.unwrap();
        assert_eq!(done, Completion::Removed { toast, ok: true });
    }
}
