//! Records command - CRUD on entity records, singly or in batches.

use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::{Map, Value};
use tracing::info;

use super::print_items;
use crate::api::FysoClient;
use crate::cli::AuthArgs;
use crate::local::LocalConfig;
use crate::types::{DEFAULT_LIMIT, OperationKind, RecordRequest};

#[derive(Args)]
pub struct RecordsCmd {
    #[command(subcommand)]
    pub command: RecordsSubCmd,
}

#[derive(Subcommand)]
pub enum RecordsSubCmd {
    /// Create a record
    Create(CreateCmd),

    /// Fetch one record
    Get(RecordIdCmd),

    /// List records, one JSON line per record
    List(ListCmd),

    /// Update a record
    Update(UpdateCmd),

    /// Delete a record
    Delete(RecordIdCmd),

    /// Run requests from a JSON-lines file, in order
    Batch(BatchCmd),
}

#[derive(Args)]
pub struct CreateCmd {
    /// Entity name
    #[arg(long, short = 'e')]
    pub entity: String,

    /// Field values as a JSON object
    #[arg(long, short = 'd')]
    pub data: String,
}

#[derive(Args)]
pub struct RecordIdCmd {
    /// Entity name
    #[arg(long, short = 'e')]
    pub entity: String,

    /// Record id
    pub id: String,
}

#[derive(Args)]
pub struct ListCmd {
    /// Entity name
    #[arg(long, short = 'e')]
    pub entity: String,

    /// Max records
    #[arg(long, short = 'l', default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,

    /// Records to skip
    #[arg(long, short = 'o', default_value_t = 0)]
    pub offset: u32,
}

#[derive(Args)]
pub struct UpdateCmd {
    /// Entity name
    #[arg(long, short = 'e')]
    pub entity: String,

    /// Record id
    pub id: String,

    /// Field values as a JSON object
    #[arg(long, short = 'd')]
    pub data: String,
}

#[derive(Args)]
pub struct BatchCmd {
    /// JSON-lines file of requests ("-" for stdin)
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Entity for lines that do not name one
    #[arg(long, short = 'e')]
    pub entity: Option<String>,

    /// Operation for lines that do not name one
    #[arg(long)]
    pub operation: Option<OperationKind>,

    /// Emit {"error": ...} for failing lines and keep going
    #[arg(long)]
    pub continue_on_fail: bool,
}

fn parse_fields(data: &str) -> Result<Map<String, Value>> {
    serde_json::from_str(data).context("--data must be a JSON object")
}

impl BatchCmd {
    fn read_requests(&self, tenant: Option<&str>) -> Result<Vec<RecordRequest>> {
        let reader: Box<dyn BufRead> = if self.input.as_os_str() == "-" {
            Box::new(BufReader::new(std::io::stdin()))
        } else {
            let file = std::fs::File::open(&self.input)
                .with_context(|| format!("Failed to open {}", self.input.display()))?;
            Box::new(BufReader::new(file))
        };

        let mut requests = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line.context("Failed to read input")?;
            if line.trim().is_empty() {
                continue;
            }

            let mut request: RecordRequest = serde_json::from_str(&line)
                .with_context(|| format!("Invalid request on line {}", n + 1))?;

            if request.entity.is_empty() {
                request.entity = self.entity.clone().unwrap_or_default();
            }
            if request.operation.is_empty() {
                if let Some(op) = self.operation {
                    request.operation = op.to_string();
                }
            }
            if request.tenant_id.is_none() {
                request.tenant_id = tenant.map(str::to_string);
            }

            requests.push(request);
        }

        Ok(requests)
    }
}

impl RecordsCmd {
    pub async fn run(&self, auth: &AuthArgs) -> Result<()> {
        let config = LocalConfig::load()?;
        let credential = auth.credential(&config)?;
        let tenant = auth.tenant(&config);

        let single = |entity: &str, operation: OperationKind| RecordRequest {
            tenant_id: tenant.clone(),
            entity: entity.to_string(),
            operation: operation.to_string(),
            ..Default::default()
        };

        let (requests, continue_on_fail) = match &self.command {
            RecordsSubCmd::Create(cmd) => {
                let mut request = single(&cmd.entity, OperationKind::Create);
                request.fields = Some(parse_fields(&cmd.data)?);
                (vec![request], false)
            }
            RecordsSubCmd::Get(cmd) => {
                let mut request = single(&cmd.entity, OperationKind::Get);
                request.record_id = Some(cmd.id.clone());
                (vec![request], false)
            }
            RecordsSubCmd::List(cmd) => {
                let mut request = single(&cmd.entity, OperationKind::List);
                request.limit = Some(cmd.limit);
                request.offset = Some(cmd.offset);
                (vec![request], false)
            }
            RecordsSubCmd::Update(cmd) => {
                let mut request = single(&cmd.entity, OperationKind::Update);
                request.record_id = Some(cmd.id.clone());
                request.fields = Some(parse_fields(&cmd.data)?);
                (vec![request], false)
            }
            RecordsSubCmd::Delete(cmd) => {
                let mut request = single(&cmd.entity, OperationKind::Delete);
                request.record_id = Some(cmd.id.clone());
                (vec![request], false)
            }
            RecordsSubCmd::Batch(cmd) => {
                let requests = cmd.read_requests(tenant.as_deref())?;
                info!(count = requests.len(), "running batch");
                (requests, cmd.continue_on_fail)
            }
        };

        let client = FysoClient::new();
        let items = client
            .execute_records(&credential, &requests, continue_on_fail)
            .await?;

        print_items(&items)
    }
}
