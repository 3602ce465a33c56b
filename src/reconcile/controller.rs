//! Reconciliation Controller
//!
//! Drives one managed object through its lifecycle: validate, project,
//! call the platform, read back, and only then hand out a new snapshot.
//!
//! The remote id is captured once, at create or import, and used directly
//! afterwards. Name lookups happen only when no id is known yet
//! (`import_by_name`, `reconcile_by_name`, and create against an API that
//! does not echo ids). Every operation is a short sequence of awaited calls
//! with no retries; the first failure is returned as is.

use chrono::Utc;
use tracing::{debug, info, warn};

use super::kinds::Resource;
use super::types::{Lifecycle, Operation, ReadOutcome, Snapshot};
use crate::client::{ApiClient, ApiError, WireObject};
use crate::error::{ConsistencyError, ReconcileError};

pub struct Reconciler<C> {
    client: C,
}

impl<C: ApiClient> Reconciler<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Planned -> Created
    pub async fn create<R: Resource>(
        &self,
        input: &R::Input,
    ) -> Result<Snapshot<R::Model>, ReconcileError> {
        let state = next::<R>(Lifecycle::Planned, Operation::Create, R::input_name(input))?;
        let model = validated::<R>(input)?;
        let name = R::name(&model).to_string();
        report_warnings::<R>(&model);

        if R::PROBE_BEFORE_CREATE {
            let exists = self
                .client
                .exists::<R::Wire>(&name)
                .await
                .map_err(|e| remote::<R>(Operation::Create, &name, e))?;
            if exists {
                return Err(ReconcileError::AlreadyExists { kind: R::KIND, name });
            }
        }

        let mut wire = R::to_wire(&model);
        wire.set_customer(self.client.customer_id());

        info!(kind = %R::KIND, name = %name, "Creating");
        let created = self
            .client
            .create(&wire)
            .await
            .map_err(|e| remote::<R>(Operation::Create, &name, e))?;

        let id = match created.id() {
            Some(id) => id,
            None => {
                debug!(kind = %R::KIND, name = %name, "Create returned no id, resolving by name");
                self.client
                    .id_by_name::<R::Wire>(&name)
                    .await
                    .map_err(|e| remote::<R>(Operation::Create, &name, e))?
                    .ok_or_else(|| ReconcileError::IdNotResolved {
                        kind: R::KIND,
                        name: name.clone(),
                    })?
            }
        };

        let model = consistent::<R>(&created, &name)?;
        info!(kind = %R::KIND, name = %name, id, "Created");

        Ok(Snapshot {
            kind: R::KIND,
            id,
            name,
            model,
            state,
            last_updated: Utc::now(),
        })
    }

    /// Created | Synced | Updated -> Synced, or report that the object is gone or renamed
    pub async fn read<R: Resource>(
        &self,
        snapshot: &Snapshot<R::Model>,
    ) -> Result<ReadOutcome<R::Model>, ReconcileError> {
        let state = next::<R>(snapshot.state, Operation::Read, &snapshot.name)?;

        let wire = match self.client.get_by_id::<R::Wire>(snapshot.id).await {
            Ok(wire) => wire,
            Err(ApiError::NotFound) => {
                info!(kind = %R::KIND, name = %snapshot.name, id = snapshot.id, "Remote object is gone");
                return Ok(ReadOutcome::Gone);
            }
            Err(e) => return Err(remote::<R>(Operation::Read, &snapshot.name, e)),
        };

        let model = consistent::<R>(&wire, &snapshot.name)?;
        let remote_name = R::name(&model);
        if remote_name != snapshot.name {
            warn!(
                kind = %R::KIND,
                id = snapshot.id,
                local = %snapshot.name,
                remote = %remote_name,
                "Renamed out of band, needs replacement"
            );
            return Ok(ReadOutcome::Replace {
                remote_name: remote_name.to_string(),
            });
        }

        debug!(kind = %R::KIND, name = %snapshot.name, id = snapshot.id, "Synced");
        Ok(ReadOutcome::Synced(Snapshot {
            model,
            state,
            ..snapshot.clone()
        }))
    }

    /// Created | Synced | Updated -> Updated: PATCH, then read back
    pub async fn update<R: Resource>(
        &self,
        snapshot: &Snapshot<R::Model>,
        input: &R::Input,
    ) -> Result<Snapshot<R::Model>, ReconcileError> {
        let state = next::<R>(snapshot.state, Operation::Update, &snapshot.name)?;
        let desired = validated::<R>(input)?;

        if let Some(field) = R::immutable_change(&snapshot.model, &desired) {
            return Err(ReconcileError::RequiresReplacement {
                kind: R::KIND,
                name: snapshot.name.clone(),
                field,
            });
        }

        self.ensure_identity::<R>(snapshot, Operation::Update).await?;
        report_warnings::<R>(&desired);

        info!(kind = %R::KIND, name = %snapshot.name, id = snapshot.id, "Updating");
        self.client
            .update(snapshot.id, &R::to_update_wire(&desired))
            .await
            .map_err(|e| remote::<R>(Operation::Update, &snapshot.name, e))?;

        let wire = self
            .client
            .get_by_id::<R::Wire>(snapshot.id)
            .await
            .map_err(|e| remote::<R>(Operation::Update, &snapshot.name, e))?;
        let model = consistent::<R>(&wire, &snapshot.name)?;
        let name = R::name(&model).to_string();
        info!(kind = %R::KIND, name = %name, id = snapshot.id, "Updated");

        Ok(Snapshot {
            kind: R::KIND,
            id: snapshot.id,
            name,
            model,
            state,
            last_updated: Utc::now(),
        })
    }

    /// Created | Synced | Updated -> Deleted
    pub async fn delete<R: Resource>(
        &self,
        snapshot: &Snapshot<R::Model>,
    ) -> Result<Snapshot<R::Model>, ReconcileError> {
        let state = next::<R>(snapshot.state, Operation::Delete, &snapshot.name)?;
        self.ensure_identity::<R>(snapshot, Operation::Delete).await?;

        info!(kind = %R::KIND, name = %snapshot.name, id = snapshot.id, "Deleting");
        self.client
            .delete::<R::Wire>(snapshot.id)
            .await
            .map_err(|e| remote::<R>(Operation::Delete, &snapshot.name, e))?;

        Ok(Snapshot {
            state,
            last_updated: Utc::now(),
            ..snapshot.clone()
        })
    }

    /// Build a Synced snapshot from nothing but a numeric id
    pub async fn import<R: Resource>(&self, id: &str) -> Result<Snapshot<R::Model>, ReconcileError> {
        let id: i64 = id
            .trim()
            .parse()
            .map_err(|_| ReconcileError::InvalidImportId(id.to_string()))?;
        self.import_id::<R>(id).await
    }

    /// Resolve the id by name, then import
    pub async fn import_by_name<R: Resource>(
        &self,
        name: &str,
    ) -> Result<Snapshot<R::Model>, ReconcileError> {
        let id = self.resolve::<R>(Operation::Import, name).await?.ok_or_else(|| {
            ReconcileError::IdNotResolved {
                kind: R::KIND,
                name: name.to_string(),
            }
        })?;
        self.import_id::<R>(id).await
    }

    /// Converge the object named by `input`: create it when absent, otherwise
    /// adopt it and update it if it differs
    pub async fn reconcile_by_name<R: Resource>(
        &self,
        input: &R::Input,
    ) -> Result<Snapshot<R::Model>, ReconcileError> {
        let desired = validated::<R>(input)?;
        let name = R::name(&desired);

        match self.resolve::<R>(Operation::Read, name).await? {
            None => self.create::<R>(input).await,
            Some(id) => {
                let current = self.import_id::<R>(id).await?;
                if current.model == desired {
                    debug!(kind = %R::KIND, name = %name, id, "Already in sync");
                    Ok(current)
                } else {
                    self.update::<R>(&current, input).await
                }
            }
        }
    }

    /// Every object of this kind visible to the customer, as Synced snapshots
    pub async fn list<R: Resource>(&self) -> Result<Vec<Snapshot<R::Model>>, ReconcileError> {
        let wires = self
            .client
            .list_all::<R::Wire>()
            .await
            .map_err(|e| remote::<R>(Operation::Read, "*", e))?;

        let now = Utc::now();
        let mut snapshots = Vec::with_capacity(wires.len());
        for wire in &wires {
            let label = wire.name().unwrap_or_default().to_string();
            let model = consistent::<R>(wire, &label)?;
            let id = wire.id().ok_or_else(|| ReconcileError::Consistency {
                kind: R::KIND,
                name: label.clone(),
                source: ConsistencyError::MissingAttribute("id"),
            })?;
            snapshots.push(Snapshot {
                kind: R::KIND,
                id,
                name: R::name(&model).to_string(),
                model,
                state: Lifecycle::Synced,
                last_updated: now,
            });
        }
        debug!(kind = %R::KIND, count = snapshots.len(), "Listed");
        Ok(snapshots)
    }

    async fn import_id<R: Resource>(&self, id: i64) -> Result<Snapshot<R::Model>, ReconcileError> {
        let state = next::<R>(Lifecycle::Planned, Operation::Import, &id.to_string())?;

        let wire = self
            .client
            .get_by_id::<R::Wire>(id)
            .await
            .map_err(|e| remote::<R>(Operation::Import, &id.to_string(), e))?;
        let model = consistent::<R>(&wire, &id.to_string())?;
        let name = R::name(&model).to_string();
        info!(kind = %R::KIND, name = %name, id, "Imported");

        // Nothing remote records when we last touched it
        Ok(Snapshot {
            kind: R::KIND,
            id,
            name,
            model,
            state,
            last_updated: Utc::now(),
        })
    }

    async fn resolve<R: Resource>(
        &self,
        operation: Operation,
        name: &str,
    ) -> Result<Option<i64>, ReconcileError> {
        self.client
            .id_by_name::<R::Wire>(name)
            .await
            .map_err(|e| remote::<R>(operation, name, e))
    }

    /// Refuse to mutate an object whose remote name no longer matches ours
    async fn ensure_identity<R: Resource>(
        &self,
        snapshot: &Snapshot<R::Model>,
        operation: Operation,
    ) -> Result<(), ReconcileError> {
        let wire = self
            .client
            .get_by_id::<R::Wire>(snapshot.id)
            .await
            .map_err(|e| remote::<R>(operation, &snapshot.name, e))?;

        match wire.name() {
            Some(remote) if remote != snapshot.name => Err(ReconcileError::Renamed {
                kind: R::KIND,
                id: snapshot.id,
                local: snapshot.name.clone(),
                remote: remote.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

fn next<R: Resource>(
    state: Lifecycle,
    operation: Operation,
    name: &str,
) -> Result<Lifecycle, ReconcileError> {
    state
        .transition(operation)
        .ok_or_else(|| ReconcileError::InvalidTransition {
            operation,
            kind: R::KIND,
            name: name.to_string(),
            state,
        })
}

fn validated<R: Resource>(input: &R::Input) -> Result<R::Model, ReconcileError> {
    R::validate(input).map_err(|source| ReconcileError::Validation {
        kind: R::KIND,
        name: R::input_name(input).to_string(),
        source,
    })
}

fn report_warnings<R: Resource>(model: &R::Model) {
    for warning in R::warnings(model) {
        warn!(kind = %R::KIND, name = %R::name(model), "{}", warning);
    }
}

fn consistent<R: Resource>(wire: &R::Wire, name: &str) -> Result<R::Model, ReconcileError> {
    R::from_wire(wire).map_err(|source| ReconcileError::Consistency {
        kind: R::KIND,
        name: name.to_string(),
        source,
    })
}

fn remote<R: Resource>(operation: Operation, identity: &str, source: ApiError) -> ReconcileError {
    ReconcileError::Remote {
        operation,
        kind: R::KIND,
        identity: identity.to_string(),
        source,
    }
}
