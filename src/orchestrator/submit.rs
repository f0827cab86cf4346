use crate::api::ContainerApi;
use crate::editor::ChangeSet;
use crate::error::{SubmitError, ValidationError};
use crate::model::{Outcome, UpdateEvent, UpdateStep};
use tokio::sync::mpsc::UnboundedSender;

/// Execute the minimal ordered remote updates for one change set.
///
/// The rename runs strictly before the label update, never concurrently;
/// a successful rename is never rolled back, so a label-step failure after
/// it is reported as partial success. When the label update runs, the id
/// in its response is authoritative for the final outcome, since the server
/// may reissue the container under a new id.
///
/// At most one submit per session may be in flight; the caller enforces
/// that. Per-step progress is emitted on `event_tx`; a dropped receiver is
/// harmless.
pub(crate) async fn submit<A: ContainerApi>(
    api: &A,
    container_id: &str,
    change_set: &ChangeSet,
    event_tx: &UnboundedSender<UpdateEvent>,
) -> Result<Outcome, SubmitError> {
    if change_set.new_name.trim().is_empty() {
        return Err(ValidationError::EmptyName.into());
    }
    if change_set.is_empty() {
        return Err(ValidationError::NoChanges.into());
    }

    let mut renamed = false;
    if change_set.name_changed {
        let _ = event_tx.send(UpdateEvent::StepStarted {
            step: UpdateStep::Rename,
        });
        api.rename_container(container_id, &change_set.new_name)
            .await
            .map_err(|source| {
                tracing::warn!(container_id, error = %source, "rename failed");
                SubmitError::Remote {
                    step: UpdateStep::Rename,
                    renamed: false,
                    source,
                }
            })?;
        renamed = true;
        let _ = event_tx.send(UpdateEvent::StepCompleted {
            step: UpdateStep::Rename,
            container_id: container_id.to_string(),
        });
    }

    let mut final_id = container_id.to_string();
    let mut labels_updated = false;
    if change_set.labels_changed {
        let _ = event_tx.send(UpdateEvent::StepStarted {
            step: UpdateStep::LabelUpdate,
        });
        let updated = api
            .update_labels(container_id, &change_set.new_labels)
            .await
            .map_err(|source| {
                tracing::warn!(container_id, error = %source, "label update failed");
                SubmitError::Remote {
                    step: UpdateStep::LabelUpdate,
                    renamed,
                    source,
                }
            })?;
        final_id = updated.id;
        labels_updated = true;
        let _ = event_tx.send(UpdateEvent::StepCompleted {
            step: UpdateStep::LabelUpdate,
            container_id: final_id.clone(),
        });
    }

    Ok(Outcome {
        final_id,
        renamed,
        labels_updated,
    })
}
