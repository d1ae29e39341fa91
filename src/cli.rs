//! Command-line surface.
//!
//! `awsop [GLOBAL] <service> <operation> [PARAMETERS] [INVOCATION]`
//!
//! Operation parameters come from the typed inputs in `awsop_aws`; the
//! invocation flags (`--select`, `--max-items`, ...) are shared by every
//! operation and map onto [`InvocationOptions`].

use awsop_aws::codepipeline::{
    DeletePipelineInput, GetPipelineExecutionInput, GetPipelineInput, GetPipelineStateInput,
    ListActionExecutionsInput, ListActionTypesInput, ListPipelineExecutionsInput,
    ListPipelinesInput, ListTagsForResourceInput, StartPipelineExecutionInput,
    StopPipelineExecutionInput,
};
use awsop_aws::geoplaces::{GetPlaceInput, ReverseGeocodeInput, SearchNearbyInput, SearchTextInput};
use awsop_aws::SettingsOverride;
use awsop_core::InvocationOptions;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Typed AWS operations with paging and output projection
#[derive(Debug, Parser)]
#[command(name = "awsop")]
#[command(version)]
#[command(about = "Typed AWS operations with paging and output projection", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub service: Service,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// AWS region (overrides AWS_REGION and the config file)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Named profile from the shared AWS config
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Send every request to this endpoint instead of the regional one
    #[arg(long, value_name = "URL", global = true)]
    pub endpoint_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub request_timeout: Option<u64>,

    /// Path to configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Pretty-print JSON output instead of one value per line
    #[arg(long, global = true)]
    pub pretty: bool,
}

impl GlobalArgs {
    /// Flags are the highest configuration layer.
    pub fn overrides(&self) -> SettingsOverride {
        SettingsOverride {
            region: self.region.clone(),
            profile: self.profile.clone(),
            endpoint_url: self.endpoint_url.clone(),
            request_timeout_secs: self.request_timeout,
        }
    }
}

/// Output and paging controls shared by all operations.
#[derive(Debug, Clone, Default, Args)]
pub struct InvocationArgs {
    /// What to output: '*' for the whole response, a response field, or
    /// '^Parameter' to echo an input
    #[arg(long, value_name = "SELECTOR")]
    pub select: Option<String>,

    /// Echo the operation's main identifying parameter
    #[arg(long)]
    pub pass_thru: bool,

    /// Continuation token from an earlier, truncated run
    #[arg(long, value_name = "TOKEN")]
    pub next_token: Option<String>,

    /// Stop after this many items in total
    #[arg(long, value_name = "N")]
    pub max_items: Option<usize>,

    /// Fetch a single page only
    #[arg(long)]
    pub no_auto_iteration: bool,

    /// Keep following tokens even when --next-token is given
    #[arg(long)]
    pub auto_iterate: bool,

    /// Do not ask for confirmation before changing anything
    #[arg(long)]
    pub force: bool,
}

impl InvocationArgs {
    pub fn options(&self) -> InvocationOptions {
        InvocationOptions {
            select: self.select.clone(),
            pass_thru: self.pass_thru,
            next_token: self.next_token.clone(),
            max_items: self.max_items,
            no_auto_iteration: self.no_auto_iteration,
            auto_iterate: self.auto_iterate,
            force: self.force,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Service {
    /// AWS CodePipeline
    #[command(subcommand)]
    Codepipeline(PipelineCommand),

    /// Amazon Location Service places
    #[command(subcommand)]
    Geoplaces(PlacesCommand),
}

#[derive(Debug, Subcommand)]
pub enum PipelineCommand {
    /// List pipelines
    ListPipelines {
        #[command(flatten)]
        input: ListPipelinesInput,
        #[command(flatten)]
        invocation: InvocationArgs,
    },
    /// List recent executions of a pipeline
    ListPipelineExecutions {
        #[command(flatten)]
        input: ListPipelineExecutionsInput,
        #[command(flatten)]
        invocation: InvocationArgs,
    },
    /// List action executions of a pipeline
    ListActionExecutions {
        #[command(flatten)]
        input: ListActionExecutionsInput,
        #[command(flatten)]
        invocation: InvocationArgs,
    },
    /// List available action types
    ListActionTypes {
        #[command(flatten)]
        input: ListActionTypesInput,
        #[command(flatten)]
        invocation: InvocationArgs,
    },
    /// List tags on a CodePipeline resource
    ListTagsForResource {
        #[command(flatten)]
        input: ListTagsForResourceInput,
        #[command(flatten)]
        invocation: InvocationArgs,
    },
    /// Show a pipeline's structure
    GetPipeline {
        #[command(flatten)]
        input: GetPipelineInput,
        #[command(flatten)]
        invocation: InvocationArgs,
    },
    /// Show the state of each stage of a pipeline
    GetPipelineState {
        #[command(flatten)]
        input: GetPipelineStateInput,
        #[command(flatten)]
        invocation: InvocationArgs,
    },
    /// Show one pipeline execution
    GetPipelineExecution {
        #[command(flatten)]
        input: GetPipelineExecutionInput,
        #[command(flatten)]
        invocation: InvocationArgs,
    },
    /// Start a pipeline run
    StartPipelineExecution {
        #[command(flatten)]
        input: StartPipelineExecutionInput,
        #[command(flatten)]
        invocation: InvocationArgs,
    },
    /// Stop a running pipeline execution
    StopPipelineExecution {
        #[command(flatten)]
        input: StopPipelineExecutionInput,
        #[command(flatten)]
        invocation: InvocationArgs,
    },
    /// Delete a pipeline
    DeletePipeline {
        #[command(flatten)]
        input: DeletePipelineInput,
        #[command(flatten)]
        invocation: InvocationArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum PlacesCommand {
    /// Find places near a position
    SearchNearby {
        #[command(flatten)]
        input: SearchNearbyInput,
        #[command(flatten)]
        invocation: InvocationArgs,
    },
    /// Free-text place search
    SearchText {
        #[command(flatten)]
        input: SearchTextInput,
        #[command(flatten)]
        invocation: InvocationArgs,
    },
    /// Addresses and places at a position
    ReverseGeocode {
        #[command(flatten)]
        input: ReverseGeocodeInput,
        #[command(flatten)]
        invocation: InvocationArgs,
    },
    /// Details of one place
    GetPlace {
        #[command(flatten)]
        input: GetPlaceInput,
        #[command(flatten)]
        invocation: InvocationArgs,
    },
}
