/// Common arguments shared by all commands
#[derive(Debug, Clone, Default)]
pub struct CommonArgs {
    pub dry_run: bool,
    pub message: Option<String>,
}

/// Arguments specific to commit command
#[derive(Debug, Clone, Default)]
pub struct CommitArgs {
    pub common: CommonArgs,
    pub no_confirm: bool,
    pub stage_all: bool,
    pub push: bool,
    pub model: Option<String>,
}

/// Arguments specific to config command
#[derive(Debug, Clone, Default)]
pub struct ConfigArgs {
    pub show: bool,
    pub init: bool,
}
