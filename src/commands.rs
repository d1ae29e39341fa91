//! Command dispatch.
//!
//! Each subcommand hands its typed input to the runner as either a paged or
//! a single-call operation. Configuration is layered here (file, then
//! environment, then flags); the client itself is only connected when the
//! first request goes out, after the input has been validated.

use crate::cli::{Cli, InvocationArgs, PipelineCommand, PlacesCommand, Service};
use crate::confirm::TerminalConfirm;
use crate::output::JsonLines;
use awsop_aws::codepipeline as cp;
use awsop_aws::geoplaces as places;
use awsop_aws::{AwsClient, AwsError, AwsOperation, ClientSettings, SettingsOverride};
use async_trait::async_trait;
use awsop_core::{
    CancellationToken, InvocationError, InvocationReport, Invoke, Page, PagedRequest, Runner,
};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

pub type CommandResult = Result<InvocationReport, InvocationError<AwsError>>;

/// An [`AwsClient`] that loads the SDK configuration on its first request.
pub struct LazyClient {
    settings: ClientSettings,
    client: OnceCell<AwsClient>,
}

impl LazyClient {
    pub fn new(settings: ClientSettings) -> Self {
        Self {
            settings,
            client: OnceCell::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.initialized()
    }

    async fn get(&self) -> Result<&AwsClient, AwsError> {
        self.client
            .get_or_try_init(|| async {
                let client = AwsClient::connect(self.settings.clone()).await?;
                tracing::debug!(region = client.region_name(), "client ready");
                Ok::<_, AwsError>(client)
            })
            .await
    }
}

#[async_trait]
impl<O> Invoke<O> for LazyClient
where
    O: AwsOperation,
    O::Response: DeserializeOwned,
{
    type Error = AwsError;

    async fn invoke(&self, request: &O::Request) -> Result<O::Response, AwsError> {
        let client = self.get().await?;
        <AwsClient as Invoke<O>>::invoke(client, request).await
    }
}

/// Everything one invocation needs besides its input.
pub struct Session<'a> {
    pub client: &'a LazyClient,
    pub gate: &'a TerminalConfirm,
    pub cancel: CancellationToken,
    pub pretty: bool,
}

impl Session<'_> {
    async fn paged<O>(&self, input: &O::Input, invocation: &InvocationArgs) -> CommandResult
    where
        O: AwsOperation,
        O::Request: PagedRequest,
        O::Response: Page + DeserializeOwned,
    {
        let sink = JsonLines::stdout(self.pretty);
        let mut runner = Runner::new(self.client, self.gate, sink, self.cancel.clone());
        let result = runner.run_paged::<O>(input, &invocation.options()).await;
        tracing::debug!(lines = runner.into_sink().written(), "{}: output written", O::NAME);
        result
    }

    async fn single<O>(&self, input: &O::Input, invocation: &InvocationArgs) -> CommandResult
    where
        O: AwsOperation,
        O::Response: DeserializeOwned,
    {
        let sink = JsonLines::stdout(self.pretty);
        let mut runner = Runner::new(self.client, self.gate, sink, self.cancel.clone());
        let result = runner.run_single::<O>(input, &invocation.options()).await;
        tracing::debug!(lines = runner.into_sink().written(), "{}: output written", O::NAME);
        result
    }
}

/// Resolve settings from every layer, lowest precedence first.
pub fn resolve_settings(cli: &Cli) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::load(cli.global.config.as_deref())?;
    settings.apply(SettingsOverride::from_env()?);
    settings.apply(cli.global.overrides());
    Ok(settings)
}

/// Stop paging on Ctrl-C. The call in flight is allowed to finish.
fn cancel_on_interrupt() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted; stopping after the current request");
            token.cancel();
        }
    });
    cancel
}

pub async fn run(cli: Cli) -> anyhow::Result<InvocationReport> {
    let client = LazyClient::new(resolve_settings(&cli)?);
    let gate = TerminalConfirm::new();
    let session = Session {
        client: &client,
        gate: &gate,
        cancel: cancel_on_interrupt(),
        pretty: cli.global.pretty,
    };
    let report = dispatch(&session, &cli.service).await?;
    tracing::info!(
        status = ?report.status,
        calls = report.calls,
        items = report.items,
        connected = client.is_connected(),
        "done"
    );
    Ok(report)
}

pub async fn dispatch(session: &Session<'_>, service: &Service) -> CommandResult {
    match service {
        Service::Codepipeline(command) => pipeline(session, command).await,
        Service::Geoplaces(command) => geo(session, command).await,
    }
}

async fn pipeline(s: &Session<'_>, command: &PipelineCommand) -> CommandResult {
    match command {
        PipelineCommand::ListPipelines { input, invocation } => {
            s.paged::<cp::ListPipelines>(input, invocation).await
        }
        PipelineCommand::ListPipelineExecutions { input, invocation } => {
            s.paged::<cp::ListPipelineExecutions>(input, invocation).await
        }
        PipelineCommand::ListActionExecutions { input, invocation } => {
            s.paged::<cp::ListActionExecutions>(input, invocation).await
        }
        PipelineCommand::ListActionTypes { input, invocation } => {
            s.paged::<cp::ListActionTypes>(input, invocation).await
        }
        PipelineCommand::ListTagsForResource { input, invocation } => {
            s.paged::<cp::ListTagsForResource>(input, invocation).await
        }
        PipelineCommand::GetPipeline { input, invocation } => {
            s.single::<cp::GetPipeline>(input, invocation).await
        }
        PipelineCommand::GetPipelineState { input, invocation } => {
            s.single::<cp::GetPipelineState>(input, invocation).await
        }
        PipelineCommand::GetPipelineExecution { input, invocation } => {
            s.single::<cp::GetPipelineExecution>(input, invocation).await
        }
        PipelineCommand::StartPipelineExecution { input, invocation } => {
            s.single::<cp::StartPipelineExecution>(input, invocation).await
        }
        PipelineCommand::StopPipelineExecution { input, invocation } => {
            s.single::<cp::StopPipelineExecution>(input, invocation).await
        }
        PipelineCommand::DeletePipeline { input, invocation } => {
            s.single::<cp::DeletePipeline>(input, invocation).await
        }
    }
}

async fn geo(s: &Session<'_>, command: &PlacesCommand) -> CommandResult {
    match command {
        PlacesCommand::SearchNearby { input, invocation } => {
            s.paged::<places::SearchNearby>(input, invocation).await
        }
        PlacesCommand::SearchText { input, invocation } => {
            s.paged::<places::SearchText>(input, invocation).await
        }
        PlacesCommand::ReverseGeocode { input, invocation } => {
            s.single::<places::ReverseGeocode>(input, invocation).await
        }
        PlacesCommand::GetPlace { input, invocation } => {
            s.single::<places::GetPlace>(input, invocation).await
        }
    }
}
