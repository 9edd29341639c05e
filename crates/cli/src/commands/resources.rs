//! Resource commands shared by users, groups, orgs, stores, products and
//! clients.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use ciam_core::resources::{changed_fields, parse_user_import, patch_body, run_batch, ResourceKind};
use ciam_domain::{CallParams, CiamError, Operation};
use ciam_infra::{ApiError, ApiResponse};
use serde_json::Value;

use crate::cli::{CrudCommand, DiffableCommand, UsersCommand};
use crate::context::{AppContext, CredentialCheck, Session};
use crate::output;

/// A resource command with its arguments, independent of resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceAction {
    List,
    Get { ids: Vec<String>, concurrency: usize },
    Create { file: PathBuf },
    Update { id: String, file: PathBuf },
    Delete { id: String },
    Diff { id: String, file: PathBuf },
    Apply { id: String, file: PathBuf },
    Import { files: Vec<PathBuf>, dry_run: bool },
}

impl From<CrudCommand> for ResourceAction {
    fn from(command: CrudCommand) -> Self {
        match command {
            CrudCommand::List => Self::List,
            CrudCommand::Get { ids, concurrency } => Self::Get { ids, concurrency: usize::from(concurrency) },
            CrudCommand::Create { file } => Self::Create { file },
            CrudCommand::Update { id, file } => Self::Update { id, file },
            CrudCommand::Delete { id } => Self::Delete { id },
        }
    }
}

impl From<UsersCommand> for ResourceAction {
    fn from(command: UsersCommand) -> Self {
        match command {
            UsersCommand::Crud(crud) => crud.into(),
            UsersCommand::Import { files, dry_run } => Self::Import { files, dry_run },
        }
    }
}

impl From<DiffableCommand> for ResourceAction {
    fn from(command: DiffableCommand) -> Self {
        match command {
            DiffableCommand::Crud(crud) => crud.into(),
            DiffableCommand::Diff { id, file } => Self::Diff { id, file },
            DiffableCommand::Apply { id, file } => Self::Apply { id, file },
        }
    }
}

/// Run one resource command, then report where the audit artifact went.
pub async fn handle(
    ctx: &AppContext,
    kind: ResourceKind,
    store_id: Option<String>,
    action: ResourceAction,
) -> Result<()> {
    if let ResourceAction::Import { files, dry_run: true } = &action {
        return import_dry_run(files);
    }

    ctx.config.require_target()?;
    let store_id = if kind.requires_store_header() {
        Some(ctx.require_store_id(store_id.as_deref())?)
    } else {
        None
    };
    let session = ctx.session(&[kind.credential_class()], CredentialCheck::Eager)?;
    let handler = Handler { kind, session: &session, store_id, verbose: ctx.verbose };

    let outcome = match action {
        ResourceAction::List => handler.list().await,
        ResourceAction::Get { ids, concurrency } => handler.get(ids, concurrency).await,
        ResourceAction::Create { file } => handler.create(&file).await,
        ResourceAction::Update { id, file } => handler.update(&id, &file).await,
        ResourceAction::Delete { id } => handler.delete(&id).await,
        ResourceAction::Diff { id, file } => handler.diff(&id, &file).await,
        ResourceAction::Apply { id, file } => handler.apply(&id, &file).await,
        ResourceAction::Import { files, .. } => handler.import(&files).await,
    };

    if let Some(path) = session.pipeline.audit().location() {
        println!("{}", output::audit_location(&path));
    }
    outcome
}

struct Handler<'a> {
    kind: ResourceKind,
    session: &'a Session,
    store_id: Option<String>,
    verbose: bool,
}

impl Handler<'_> {
    fn params(&self) -> CallParams {
        CallParams::new().with_store_id(self.store_id.clone())
    }

    fn params_for(&self, id: &str) -> CallParams {
        self.params().with_path_param("id", id)
    }

    async fn call(&self, operation: &Operation, params: &CallParams) -> Result<ApiResponse, ApiError> {
        self.session.pipeline.execute(operation, self.session.target, params).await
    }

    fn noun(&self) -> &'static str {
        self.kind.singular()
    }

    fn detail(&self, value: &Value) -> Result<()> {
        if self.verbose {
            println!("{}", output::json_block(value, 6)?);
        }
        Ok(())
    }

    async fn list(&self) -> Result<()> {
        let title = format!("list {}", self.kind);
        println!("{}", output::start(&title));

        let result = self.call(&self.kind.list(), &self.params()).await;
        let response = finish(&title, result)?;
        let body = response.json();
        match body.as_array() {
            Some(items) => {
                println!("{}", output::step(&format!("Found {} {}(s)", items.len(), self.noun())));
                for item in items {
                    let id = item.get("id").and_then(Value::as_str).unwrap_or("?");
                    println!("{}", output::step_at(4, &format!("{id}: {}", output::display_name(item))));
                    self.detail(item)?;
                }
            }
            None => println!("{}", output::json_block(&body, 4)?),
        }
        println!("{}", output::end(&title, true));
        Ok(())
    }

    async fn get(&self, ids: Vec<String>, concurrency: usize) -> Result<()> {
        let title = format!("get {}", self.kind);
        println!("{}", output::start(&title));
        for id in &ids {
            println!("{}", output::step(&format!("Fetching {}: {id}", self.noun())));
        }

        let operation = self.kind.get();
        let operation = &operation;
        let report = run_batch(ids, concurrency, |id| {
            let params = self.params_for(&id);
            async move { self.call(operation, &params).await.map(|r| r.json()) }
        })
        .await;

        for (id, item) in &report.successes {
            let line = format!("✓ Retrieved {} {id}: {}", self.noun(), output::display_name(item));
            println!("{}", output::step_at(4, &line));
            self.detail(item)?;
        }
        for (id, err) in &report.failures {
            println!("{}", output::step_at(4, &format!("✗ {} {id}: {err}", self.noun())));
        }
        println!("{}", output::step(&report.summary(self.noun())));
        println!("{}", output::end(&title, report.is_success()));

        if !report.is_success() {
            let total = report.failures.len() + report.successes.len();
            bail!("{} of {total} {} lookup(s) failed", report.failures.len(), self.noun());
        }
        Ok(())
    }

    async fn create(&self, file: &Path) -> Result<()> {
        let title = format!("create {}", self.noun());
        println!("{}", output::start(&title));
        let document = read_document(file)?;

        let result = self.call(&self.kind.create(), &self.params().with_body(document)).await;
        let created = finish(&title, result)?.json();
        let id = created.get("id").and_then(Value::as_str).unwrap_or("N/A");
        println!("{}", output::step(&format!("✓ Created {} {id}: {}", self.noun(), output::display_name(&created))));
        self.detail(&created)?;
        println!("{}", output::end(&title, true));
        Ok(())
    }

    async fn update(&self, id: &str, file: &Path) -> Result<()> {
        let title = format!("update {}", self.noun());
        println!("{}", output::start(&title));
        let document = read_document(file)?;

        let result = self.call(&self.kind.update(), &self.params_for(id).with_body(document)).await;
        let updated = finish(&title, result)?.json();
        println!("{}", output::step(&format!("✓ Updated {} {id}", self.noun())));
        self.detail(&updated)?;
        println!("{}", output::end(&title, true));
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let title = format!("delete {}", self.noun());
        println!("{}", output::start(&title));

        let result = self.call(&self.kind.delete(), &self.params_for(id)).await;
        finish(&title, result)?;
        println!("{}", output::step(&format!("✓ Deleted {} {id}", self.noun())));
        println!("{}", output::end(&title, true));
        Ok(())
    }

    async fn diff(&self, id: &str, file: &Path) -> Result<()> {
        let title = format!("diff {}", self.noun());
        println!("{}", output::start(&title));
        let desired = read_document(file)?;

        let result = self.call(&self.kind.get(), &self.params_for(id)).await;
        let current = finish(&title, result)?.json();
        let changes = changed_fields(&current, &desired)?;
        if changes.is_empty() {
            println!("{}", output::step("No changes"));
        }
        for change in &changes {
            let before = change.current.as_ref().map_or_else(|| "(absent)".to_string(), Value::to_string);
            println!("{}", output::step(&format!("{}: {before} → {}", change.field, change.desired)));
        }
        println!("{}", output::end(&title, true));
        Ok(())
    }

    async fn apply(&self, id: &str, file: &Path) -> Result<()> {
        let title = format!("apply {}", self.noun());
        println!("{}", output::start(&title));
        let desired = read_document(file)?;

        let result = self.call(&self.kind.get(), &self.params_for(id)).await;
        let current = finish(&title, result)?.json();
        let changes = changed_fields(&current, &desired)?;
        if changes.is_empty() {
            println!("{}", output::step("No changes; nothing sent"));
            println!("{}", output::end(&title, true));
            return Ok(());
        }

        let fields: Vec<_> = changes.iter().map(|c| c.field.as_str()).collect();
        println!("{}", output::step(&format!("Applying {} field(s): {}", fields.len(), fields.join(", "))));
        let params = self.params_for(id).with_body(patch_body(&changes));
        let result = self.call(&self.kind.patch(), &params).await;
        let applied = finish(&title, result)?.json();
        self.detail(&applied)?;
        println!("{}", output::end(&title, true));
        Ok(())
    }

    async fn import(&self, files: &[PathBuf]) -> Result<()> {
        let title = "import users";
        println!("{}", output::start(title));
        let (users, mut errors) = load_import_files(files);

        let operation = self.kind.create();
        let mut imported = 0usize;
        for (n, user) in users.into_iter().enumerate() {
            let label = user.get("email").and_then(Value::as_str).map_or_else(|| format!("#{n}"), str::to_string);
            match self.call(&operation, &self.params().with_body(user)).await {
                Ok(_) => {
                    imported += 1;
                    println!("{}", output::step_at(4, &format!("✓ Created user {label}")));
                }
                Err(err) => {
                    println!("{}", output::step_at(4, &format!("✗ User {label}: {err}")));
                    errors.push(format!("User {label}: {err}"));
                }
            }
        }

        println!("{}", output::step(&format!("Imported {imported} user(s), {} error(s)", errors.len())));
        println!("{}", output::end(title, errors.is_empty()));
        if !errors.is_empty() {
            bail!("user import finished with {} error(s)", errors.len());
        }
        Ok(())
    }
}

/// Print the failure end marker before propagating an API error.
fn finish(title: &str, result: Result<ApiResponse, ApiError>) -> Result<ApiResponse> {
    result.map_err(|err| {
        println!("{}", output::step(&format!("✗ {err}")));
        println!("{}", output::end(title, false));
        err.into()
    })
}

fn read_document(path: &Path) -> Result<Value, CiamError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| CiamError::InvalidInput(format!("cannot read {}: {err}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|err| CiamError::InvalidInput(format!("{} is not valid JSON: {err}", path.display())))
}

/// Parse every import file, reporting each one. Returns the users from the
/// valid files plus one error line per rejected file.
fn load_import_files(files: &[PathBuf]) -> (Vec<Value>, Vec<String>) {
    let mut users = Vec::new();
    let mut errors = Vec::new();
    for file in files {
        let parsed = std::fs::read_to_string(file)
            .map_err(|err| CiamError::Io(err.to_string()))
            .and_then(|raw| parse_user_import(&raw));
        match parsed {
            Ok(document) => {
                println!("{}", output::step(&format!("✓ {}: {} user(s)", file.display(), document.users.len())));
                users.extend(document.users);
            }
            Err(err) => {
                println!("{}", output::step(&format!("✗ {}: {err}", file.display())));
                errors.push(format!("{}: {err}", file.display()));
            }
        }
    }
    (users, errors)
}

fn import_dry_run(files: &[PathBuf]) -> Result<()> {
    let title = "import users (dry run)";
    println!("{}", output::start(title));
    let (users, errors) = load_import_files(files);
    println!(
        "{}",
        output::step(&format!("Validated {} user(s) from {} file(s), {} error(s)", users.len(), files.len(), errors.len()))
    );
    println!("{}", output::end(title, errors.is_empty()));
    if !errors.is_empty() {
        bail!(CiamError::InvalidInput(format!("{} import file(s) rejected", errors.len())));
    }
    Ok(())
}
