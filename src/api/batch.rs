//! Sequential per-item execution of record requests.

use tracing::{debug, warn};

use super::FysoClient;
use super::error::FysoError;
use super::transport::Transport;
use crate::types::{Credential, Item, RecordOperation, RecordRequest};

impl<T: Transport> FysoClient<T> {
    /// Run one request: resolve, authenticate, dispatch.
    ///
    /// `list` fans out into one item per record.
    pub async fn execute_record(
        &self,
        credential: &Credential,
        request: &RecordRequest,
    ) -> Result<Vec<Item>, FysoError> {
        let operation = request.resolve()?;
        let session = self.authenticate(credential, Some(request.tenant()?)).await?;
        let entity = request.entity.as_str();
        debug!(operation = %operation.kind(), entity, "dispatching");

        let items = match operation {
            RecordOperation::Create { fields } => {
                vec![Item::new(self.create_record(&session, entity, &fields).await?)]
            }
            RecordOperation::Get { id } => {
                vec![Item::new(self.get_record(&session, entity, &id).await?)]
            }
            RecordOperation::List { limit, offset } => self
                .list_records(&session, entity, limit, offset)
                .await?
                .into_iter()
                .map(Item::new)
                .collect(),
            RecordOperation::Update { id, fields } => {
                vec![Item::new(self.update_record(&session, entity, &id, &fields).await?)]
            }
            RecordOperation::Delete { id } => {
                vec![Item::new(self.delete_record(&session, entity, &id).await?)]
            }
        };

        Ok(items)
    }

    /// Run requests strictly in input order.
    ///
    /// With `continue_on_fail`, a failing item yields `{"error": message}` and
    /// the batch moves on. Authentication failures always abort.
    pub async fn execute_records(
        &self,
        credential: &Credential,
        requests: &[RecordRequest],
        continue_on_fail: bool,
    ) -> Result<Vec<Item>, FysoError> {
        let mut output = Vec::with_capacity(requests.len());

        for (index, request) in requests.iter().enumerate() {
            debug!(index, operation = %request.operation, entity = %request.entity, "executing item");

            match self.execute_record(credential, request).await {
                Ok(items) => output.extend(items),
                Err(err) if continue_on_fail && !err.is_authentication() => {
                    warn!(index, status = ?err.status(), error = %err, "item failed, continuing");
                    output.push(Item::error(err.to_string()));
                }
                Err(err) => return Err(err),
            }
        }

        Ok(output)
    }
}
