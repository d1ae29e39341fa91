//! AWS CodePipeline operations.
//!
//! CodePipeline uses the AWS JSON 1.1 protocol with target prefix
//! `CodePipeline_20150709`. Wire fields are camelCase and timestamps are
//! epoch seconds.
//!
//! | Operation              | Pages on                     | Mutating |
//! |------------------------|------------------------------|----------|
//! | ListPipelines          | `pipelines`                  |          |
//! | ListPipelineExecutions | `pipelineExecutionSummaries` |          |
//! | ListActionExecutions   | `actionExecutionDetails`     |          |
//! | ListActionTypes        | `actionTypes`                |          |
//! | ListTagsForResource    | `tags`                       |          |
//! | GetPipeline            |                              |          |
//! | GetPipelineState       |                              |          |
//! | GetPipelineExecution   |                              |          |
//! | StartPipelineExecution |                              | yes      |
//! | StopPipelineExecution  |                              | yes      |
//! | DeletePipeline         |                              | yes      |
//!
//! Reference: <https://docs.aws.amazon.com/codepipeline/latest/APIReference/>

use crate::error::AwsResult;
use crate::protocol::{AwsOperation, ServiceSpec, WireRequest};
use awsop_core::request::{collapse, non_empty, require_range, require_str};
use awsop_core::{Operation, Page, PagedRequest, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub static SERVICE: ServiceSpec = ServiceSpec {
    name: "codepipeline",
    endpoint_prefix: "codepipeline",
    signing_name: "codepipeline",
};

const TARGET_PREFIX: &str = "CodePipeline_20150709";

macro_rules! json_operation {
    ($($op:ty),+ $(,)?) => {
        $(
            impl AwsOperation for $op {
                const SERVICE: &'static ServiceSpec = &SERVICE;

                fn wire_request(request: &Self::Request) -> AwsResult<WireRequest> {
                    WireRequest::aws_json(TARGET_PREFIX, <Self as Operation>::NAME, request)
                }
            }
        )+
    };
}

macro_rules! paging {
    ($req:ty => $resp:ty, $items:ident) => {
        impl Page for $resp {
            fn next_token(&self) -> Option<&str> {
                self.next_token.as_deref()
            }

            fn item_count(&self) -> usize {
                self.$items.len()
            }

            fn truncate_items(&mut self, keep: usize) {
                self.$items.truncate(keep);
            }
        }
    };
    ($req:ty => $resp:ty, $items:ident, max_results <= $max:expr) => {
        paging!($req => $resp, $items);

        impl PagedRequest for $req {
            const MAX_PAGE_SIZE: Option<usize> = Some($max);

            fn set_next_token(&mut self, token: Option<String>) {
                self.next_token = token;
            }

            fn page_size(&self) -> Option<usize> {
                self.max_results.map(|n| n as usize)
            }

            fn set_page_size(&mut self, size: usize) {
                self.max_results = Some(size as u32);
            }
        }
    };
}

// ── Shared types ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum StartTimeRange {
    #[cfg_attr(feature = "cli", value(name = "Latest"))]
    Latest,
    #[cfg_attr(feature = "cli", value(name = "All"))]
    All,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ActionOwner {
    #[serde(rename = "AWS")]
    #[cfg_attr(feature = "cli", value(name = "AWS"))]
    Aws,
    #[cfg_attr(feature = "cli", value(name = "ThirdParty"))]
    ThirdParty,
    #[cfg_attr(feature = "cli", value(name = "Custom"))]
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionTrigger {
    pub trigger_type: Option<String>,
    pub trigger_detail: Option<String>,
}

fn validate_page_size(value: Option<u32>, max: u32) -> Result<(), ValidationError> {
    require_range("MaxResult", value, 1, max)
}

// ── ListPipelines ───────────────────────────────────────────────────────

/// List every pipeline in the account and region.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct ListPipelinesInput {
    /// Page size requested from the service (1-1000).
    #[serde(rename = "MaxResult")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub max_result: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPipelinesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary {
    pub name: Option<String>,
    pub version: Option<i64>,
    pub pipeline_type: Option<String>,
    pub execution_mode: Option<String>,
    pub created: Option<f64>,
    pub updated: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPipelinesResponse {
    #[serde(default)]
    pub pipelines: Vec<PipelineSummary>,
    pub next_token: Option<String>,
}

paging!(ListPipelinesRequest => ListPipelinesResponse, pipelines, max_results <= 1000);

pub struct ListPipelines;

impl Operation for ListPipelines {
    type Input = ListPipelinesInput;
    type Request = ListPipelinesRequest;
    type Response = ListPipelinesResponse;

    const NAME: &'static str = "ListPipelines";
    const DEFAULT_SELECT: &'static str = "pipelines";
    const RESPONSE_FIELDS: &'static [&'static str] = &["pipelines", "nextToken"];
    const PARAMETERS: &'static [&'static str] = &["MaxResult"];

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        validate_page_size(input.max_result, 1000)
    }

    fn build_request(input: &Self::Input) -> Self::Request {
        ListPipelinesRequest {
            max_results: input.max_result,
            next_token: None,
        }
    }
}

// ── ListPipelineExecutions ──────────────────────────────────────────────

/// Summaries of the most recent executions of a pipeline.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct ListPipelineExecutionsInput {
    /// Pipeline to list executions for.
    #[serde(rename = "PipelineName")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub pipeline_name: Option<String>,
    /// Only executions that succeeded in this stage.
    #[serde(rename = "Filter_SucceededInStage_StageName")]
    #[cfg_attr(feature = "cli", arg(long = "succeeded-in-stage"))]
    pub filter_succeeded_in_stage_stage_name: Option<String>,
    /// Page size requested from the service (1-100).
    #[serde(rename = "MaxResult")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub max_result: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SucceededInStageFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineExecutionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub succeeded_in_stage: Option<SucceededInStageFilter>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPipelineExecutionsRequest {
    pub pipeline_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<PipelineExecutionFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineExecutionSummary {
    pub pipeline_execution_id: Option<String>,
    pub status: Option<String>,
    pub status_summary: Option<String>,
    pub start_time: Option<f64>,
    pub last_update_time: Option<f64>,
    #[serde(default)]
    pub source_revisions: Vec<Value>,
    pub trigger: Option<ExecutionTrigger>,
    pub stop_trigger: Option<Value>,
    pub execution_mode: Option<String>,
    pub execution_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPipelineExecutionsResponse {
    #[serde(default)]
    pub pipeline_execution_summaries: Vec<PipelineExecutionSummary>,
    pub next_token: Option<String>,
}

paging!(
    ListPipelineExecutionsRequest => ListPipelineExecutionsResponse,
    pipeline_execution_summaries,
    max_results <= 100
);

pub struct ListPipelineExecutions;

impl Operation for ListPipelineExecutions {
    type Input = ListPipelineExecutionsInput;
    type Request = ListPipelineExecutionsRequest;
    type Response = ListPipelineExecutionsResponse;

    const NAME: &'static str = "ListPipelineExecutions";
    const DEFAULT_SELECT: &'static str = "pipelineExecutionSummaries";
    const RESPONSE_FIELDS: &'static [&'static str] = &["pipelineExecutionSummaries", "nextToken"];
    const PARAMETERS: &'static [&'static str] = &[
        "PipelineName",
        "Filter_SucceededInStage_StageName",
        "MaxResult",
    ];
    const PASS_THRU: Option<&'static str> = Some("PipelineName");

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        require_str("PipelineName", &input.pipeline_name)?;
        validate_page_size(input.max_result, 100)
    }

    fn build_request(input: &Self::Input) -> Self::Request {
        let succeeded_in_stage = collapse(SucceededInStageFilter {
            stage_name: input.filter_succeeded_in_stage_stage_name.clone(),
        });
        ListPipelineExecutionsRequest {
            pipeline_name: input.pipeline_name.clone().unwrap_or_default(),
            filter: collapse(PipelineExecutionFilter { succeeded_in_stage }),
            max_results: input.max_result,
            next_token: None,
        }
    }
}

// ── ListActionExecutions ────────────────────────────────────────────────

/// Action-level details for executions of a pipeline.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct ListActionExecutionsInput {
    /// Pipeline whose action executions are listed.
    #[serde(rename = "PipelineName")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub pipeline_name: Option<String>,
    /// Only actions run by this pipeline execution.
    #[serde(rename = "Filter_PipelineExecutionId")]
    #[cfg_attr(feature = "cli", arg(long = "pipeline-execution-id"))]
    pub filter_pipeline_execution_id: Option<String>,
    /// Only the latest actions of this pipeline execution.
    #[serde(rename = "LatestInPipelineExecution_PipelineExecutionId")]
    #[cfg_attr(feature = "cli", arg(long = "latest-in-execution"))]
    pub latest_in_pipeline_execution_pipeline_execution_id: Option<String>,
    /// Which actions of the latest execution to include.
    #[serde(rename = "LatestInPipelineExecution_StartTimeRange")]
    #[cfg_attr(feature = "cli", arg(long = "start-time-range", value_enum))]
    pub latest_in_pipeline_execution_start_time_range: Option<StartTimeRange>,
    /// Page size requested from the service (1-100).
    #[serde(rename = "MaxResult")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub max_result: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestInPipelineExecutionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_execution_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time_range: Option<StartTimeRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionExecutionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_execution_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_in_pipeline_execution: Option<LatestInPipelineExecutionFilter>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListActionExecutionsRequest {
    pub pipeline_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<ActionExecutionFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionExecutionDetail {
    pub pipeline_execution_id: Option<String>,
    pub action_execution_id: Option<String>,
    pub pipeline_version: Option<i64>,
    pub stage_name: Option<String>,
    pub action_name: Option<String>,
    pub start_time: Option<f64>,
    pub last_update_time: Option<f64>,
    pub updated_by: Option<String>,
    pub status: Option<String>,
    pub input: Option<Value>,
    pub output: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListActionExecutionsResponse {
    #[serde(default)]
    pub action_execution_details: Vec<ActionExecutionDetail>,
    pub next_token: Option<String>,
}

paging!(
    ListActionExecutionsRequest => ListActionExecutionsResponse,
    action_execution_details,
    max_results <= 100
);

pub struct ListActionExecutions;

impl Operation for ListActionExecutions {
    type Input = ListActionExecutionsInput;
    type Request = ListActionExecutionsRequest;
    type Response = ListActionExecutionsResponse;

    const NAME: &'static str = "ListActionExecutions";
    const DEFAULT_SELECT: &'static str = "actionExecutionDetails";
    const RESPONSE_FIELDS: &'static [&'static str] = &["actionExecutionDetails", "nextToken"];
    const PARAMETERS: &'static [&'static str] = &[
        "PipelineName",
        "Filter_PipelineExecutionId",
        "LatestInPipelineExecution_PipelineExecutionId",
        "LatestInPipelineExecution_StartTimeRange",
        "MaxResult",
    ];
    const PASS_THRU: Option<&'static str> = Some("PipelineName");

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        require_str("PipelineName", &input.pipeline_name)?;
        validate_page_size(input.max_result, 100)
    }

    fn build_request(input: &Self::Input) -> Self::Request {
        let latest = collapse(LatestInPipelineExecutionFilter {
            pipeline_execution_id: input.latest_in_pipeline_execution_pipeline_execution_id.clone(),
            start_time_range: input.latest_in_pipeline_execution_start_time_range,
        });
        ListActionExecutionsRequest {
            pipeline_name: input.pipeline_name.clone().unwrap_or_default(),
            filter: collapse(ActionExecutionFilter {
                pipeline_execution_id: input.filter_pipeline_execution_id.clone(),
                latest_in_pipeline_execution: latest,
            }),
            max_results: input.max_result,
            next_token: None,
        }
    }
}

// ── ListActionTypes ─────────────────────────────────────────────────────

/// Action types available to pipelines, optionally by owner.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct ListActionTypesInput {
    /// Only action types with this owner.
    #[serde(rename = "ActionOwnerFilter")]
    #[cfg_attr(feature = "cli", arg(long, value_enum))]
    pub action_owner_filter: Option<ActionOwner>,
    /// Only action types available in this region.
    #[serde(rename = "RegionFilter")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub region_filter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListActionTypesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_owner_filter: Option<ActionOwner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl PagedRequest for ListActionTypesRequest {
    fn set_next_token(&mut self, token: Option<String>) {
        self.next_token = token;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionTypeId {
    pub category: Option<String>,
    pub owner: Option<String>,
    pub provider: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionType {
    pub id: Option<ActionTypeId>,
    pub settings: Option<Value>,
    #[serde(default)]
    pub action_configuration_properties: Vec<Value>,
    pub input_artifact_details: Option<Value>,
    pub output_artifact_details: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListActionTypesResponse {
    #[serde(default)]
    pub action_types: Vec<ActionType>,
    pub next_token: Option<String>,
}

paging!(ListActionTypesRequest => ListActionTypesResponse, action_types);

pub struct ListActionTypes;

impl Operation for ListActionTypes {
    type Input = ListActionTypesInput;
    type Request = ListActionTypesRequest;
    type Response = ListActionTypesResponse;

    const NAME: &'static str = "ListActionTypes";
    const DEFAULT_SELECT: &'static str = "actionTypes";
    const RESPONSE_FIELDS: &'static [&'static str] = &["actionTypes", "nextToken"];
    const PARAMETERS: &'static [&'static str] = &["ActionOwnerFilter", "RegionFilter"];

    fn build_request(input: &Self::Input) -> Self::Request {
        ListActionTypesRequest {
            action_owner_filter: input.action_owner_filter,
            region_filter: input.region_filter.clone(),
            next_token: None,
        }
    }
}

// ── ListTagsForResource ─────────────────────────────────────────────────

/// Tags attached to a pipeline, custom action or webhook.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct ListTagsForResourceInput {
    /// ARN of the tagged resource.
    #[serde(rename = "ResourceArn")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub resource_arn: Option<String>,
    /// Page size requested from the service (1-100).
    #[serde(rename = "MaxResult")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub max_result: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTagsForResourceRequest {
    pub resource_arn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTagsForResourceResponse {
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub next_token: Option<String>,
}

paging!(ListTagsForResourceRequest => ListTagsForResourceResponse, tags, max_results <= 100);

pub struct ListTagsForResource;

impl Operation for ListTagsForResource {
    type Input = ListTagsForResourceInput;
    type Request = ListTagsForResourceRequest;
    type Response = ListTagsForResourceResponse;

    const NAME: &'static str = "ListTagsForResource";
    const DEFAULT_SELECT: &'static str = "tags";
    const RESPONSE_FIELDS: &'static [&'static str] = &["tags", "nextToken"];
    const PARAMETERS: &'static [&'static str] = &["ResourceArn", "MaxResult"];
    const PASS_THRU: Option<&'static str> = Some("ResourceArn");

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        require_str("ResourceArn", &input.resource_arn)?;
        validate_page_size(input.max_result, 100)
    }

    fn build_request(input: &Self::Input) -> Self::Request {
        ListTagsForResourceRequest {
            resource_arn: input.resource_arn.clone().unwrap_or_default(),
            max_results: input.max_result,
            next_token: None,
        }
    }
}

// ── GetPipeline ─────────────────────────────────────────────────────────

/// The structure of a pipeline.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct GetPipelineInput {
    /// Pipeline name.
    #[serde(rename = "Name")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub name: Option<String>,
    /// Pipeline version; the current version when omitted.
    #[serde(rename = "Version")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub version: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetPipelineRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageDeclaration {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<Value>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDeclaration {
    pub name: String,
    pub role_arn: Option<String>,
    pub version: Option<i64>,
    pub pipeline_type: Option<String>,
    #[serde(default)]
    pub stages: Vec<StageDeclaration>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineMetadata {
    pub pipeline_arn: Option<String>,
    pub created: Option<f64>,
    pub updated: Option<f64>,
    pub polling_disabled_at: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPipelineResponse {
    pub pipeline: Option<PipelineDeclaration>,
    pub metadata: Option<PipelineMetadata>,
}

pub struct GetPipeline;

impl Operation for GetPipeline {
    type Input = GetPipelineInput;
    type Request = GetPipelineRequest;
    type Response = GetPipelineResponse;

    const NAME: &'static str = "GetPipeline";
    const DEFAULT_SELECT: &'static str = "pipeline";
    const RESPONSE_FIELDS: &'static [&'static str] = &["pipeline", "metadata"];
    const PARAMETERS: &'static [&'static str] = &["Name", "Version"];
    const PASS_THRU: Option<&'static str> = Some("Name");

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        require_str("Name", &input.name)?;
        require_range("Version", input.version, 1, i64::MAX)
    }

    fn build_request(input: &Self::Input) -> Self::Request {
        GetPipelineRequest {
            name: input.name.clone().unwrap_or_default(),
            version: input.version,
        }
    }
}

// ── GetPipelineState ────────────────────────────────────────────────────

/// Current state of every stage and action of a pipeline.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct GetPipelineStateInput {
    /// Pipeline name.
    #[serde(rename = "Name")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetPipelineStateRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPipelineStateResponse {
    pub pipeline_name: Option<String>,
    pub pipeline_version: Option<i64>,
    #[serde(default)]
    pub stage_states: Vec<Value>,
    pub created: Option<f64>,
    pub updated: Option<f64>,
}

pub struct GetPipelineState;

impl Operation for GetPipelineState {
    type Input = GetPipelineStateInput;
    type Request = GetPipelineStateRequest;
    type Response = GetPipelineStateResponse;

    const NAME: &'static str = "GetPipelineState";
    const RESPONSE_FIELDS: &'static [&'static str] = &[
        "pipelineName",
        "pipelineVersion",
        "stageStates",
        "created",
        "updated",
    ];
    const PARAMETERS: &'static [&'static str] = &["Name"];
    const PASS_THRU: Option<&'static str> = Some("Name");

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        require_str("Name", &input.name)
    }

    fn build_request(input: &Self::Input) -> Self::Request {
        GetPipelineStateRequest {
            name: input.name.clone().unwrap_or_default(),
        }
    }
}

// ── GetPipelineExecution ────────────────────────────────────────────────

/// Details of one pipeline execution.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct GetPipelineExecutionInput {
    /// Pipeline the execution belongs to.
    #[serde(rename = "PipelineName")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub pipeline_name: Option<String>,
    /// Execution ID.
    #[serde(rename = "PipelineExecutionId")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub pipeline_execution_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPipelineExecutionRequest {
    pub pipeline_name: String,
    pub pipeline_execution_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedVariable {
    pub name: Option<String>,
    pub resolved_value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineExecution {
    pub pipeline_name: Option<String>,
    pub pipeline_version: Option<i64>,
    pub pipeline_execution_id: Option<String>,
    pub status: Option<String>,
    pub status_summary: Option<String>,
    #[serde(default)]
    pub artifact_revisions: Vec<Value>,
    #[serde(default)]
    pub variables: Vec<ResolvedVariable>,
    pub trigger: Option<ExecutionTrigger>,
    pub execution_mode: Option<String>,
    pub execution_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPipelineExecutionResponse {
    pub pipeline_execution: Option<PipelineExecution>,
}

pub struct GetPipelineExecution;

impl Operation for GetPipelineExecution {
    type Input = GetPipelineExecutionInput;
    type Request = GetPipelineExecutionRequest;
    type Response = GetPipelineExecutionResponse;

    const NAME: &'static str = "GetPipelineExecution";
    const DEFAULT_SELECT: &'static str = "pipelineExecution";
    const RESPONSE_FIELDS: &'static [&'static str] = &["pipelineExecution"];
    const PARAMETERS: &'static [&'static str] = &["PipelineName", "PipelineExecutionId"];
    const PASS_THRU: Option<&'static str> = Some("PipelineExecutionId");

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        require_str("PipelineName", &input.pipeline_name)?;
        require_str("PipelineExecutionId", &input.pipeline_execution_id)
    }

    fn build_request(input: &Self::Input) -> Self::Request {
        GetPipelineExecutionRequest {
            pipeline_name: input.pipeline_name.clone().unwrap_or_default(),
            pipeline_execution_id: input.pipeline_execution_id.clone().unwrap_or_default(),
        }
    }
}

// ── StartPipelineExecution ──────────────────────────────────────────────

/// Start a new run of a pipeline.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct StartPipelineExecutionInput {
    /// Pipeline to start.
    #[serde(rename = "Name")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub name: Option<String>,
    /// Idempotency token; a random UUID when omitted.
    #[serde(rename = "ClientRequestToken")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub client_request_token: Option<String>,
    /// Pipeline variable as NAME=VALUE. Repeatable.
    #[serde(rename = "Variable", skip_serializing_if = "Vec::is_empty")]
    #[cfg_attr(feature = "cli", arg(long = "variable"))]
    pub variables: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PipelineVariable {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPipelineExecutionRequest {
    pub name: String,
    pub client_request_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<PipelineVariable>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPipelineExecutionResponse {
    pub pipeline_execution_id: Option<String>,
}

fn parse_variable(raw: &str) -> Option<PipelineVariable> {
    let (name, value) = raw.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(PipelineVariable {
        name: name.to_string(),
        value: value.to_string(),
    })
}

pub struct StartPipelineExecution;

impl Operation for StartPipelineExecution {
    type Input = StartPipelineExecutionInput;
    type Request = StartPipelineExecutionRequest;
    type Response = StartPipelineExecutionResponse;

    const NAME: &'static str = "StartPipelineExecution";
    const DEFAULT_SELECT: &'static str = "pipelineExecutionId";
    const RESPONSE_FIELDS: &'static [&'static str] = &["pipelineExecutionId"];
    const PARAMETERS: &'static [&'static str] = &["Name", "ClientRequestToken", "Variable"];
    const MUTATING: bool = true;
    const PASS_THRU: Option<&'static str> = Some("Name");

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        require_str("Name", &input.name)?;
        match input.variables.iter().find(|v| parse_variable(v).is_none()) {
            Some(bad) => Err(ValidationError::invalid(
                "Variable",
                format!("'{}' is not NAME=VALUE", bad),
            )),
            None => Ok(()),
        }
    }

    fn build_request(input: &Self::Input) -> Self::Request {
        StartPipelineExecutionRequest {
            name: input.name.clone().unwrap_or_default(),
            client_request_token: input
                .client_request_token
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            variables: non_empty(
                input
                    .variables
                    .iter()
                    .filter_map(|v| parse_variable(v))
                    .collect(),
            ),
        }
    }

    fn confirm_target(input: &Self::Input) -> String {
        input.name.clone().unwrap_or_default()
    }
}

// ── StopPipelineExecution ───────────────────────────────────────────────

/// Stop an in-progress pipeline execution.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct StopPipelineExecutionInput {
    /// Pipeline the execution belongs to.
    #[serde(rename = "PipelineName")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub pipeline_name: Option<String>,
    /// Execution to stop.
    #[serde(rename = "PipelineExecutionId")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub pipeline_execution_id: Option<String>,
    /// Abandon in-progress actions instead of letting them finish.
    #[serde(rename = "Abandon")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub abandon: bool,
    /// Why the execution is stopped.
    #[serde(rename = "Reason")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPipelineExecutionRequest {
    pub pipeline_name: String,
    pub pipeline_execution_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abandon: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPipelineExecutionResponse {
    pub pipeline_execution_id: Option<String>,
}

pub struct StopPipelineExecution;

impl Operation for StopPipelineExecution {
    type Input = StopPipelineExecutionInput;
    type Request = StopPipelineExecutionRequest;
    type Response = StopPipelineExecutionResponse;

    const NAME: &'static str = "StopPipelineExecution";
    const DEFAULT_SELECT: &'static str = "pipelineExecutionId";
    const RESPONSE_FIELDS: &'static [&'static str] = &["pipelineExecutionId"];
    const PARAMETERS: &'static [&'static str] =
        &["PipelineName", "PipelineExecutionId", "Abandon", "Reason"];
    const MUTATING: bool = true;
    const PASS_THRU: Option<&'static str> = Some("PipelineExecutionId");

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        require_str("PipelineName", &input.pipeline_name)?;
        require_str("PipelineExecutionId", &input.pipeline_execution_id)?;
        match input.reason {
            Some(ref reason) if reason.chars().count() > 200 => Err(ValidationError::invalid(
                "Reason",
                "must be at most 200 characters",
            )),
            _ => Ok(()),
        }
    }

    fn build_request(input: &Self::Input) -> Self::Request {
        StopPipelineExecutionRequest {
            pipeline_name: input.pipeline_name.clone().unwrap_or_default(),
            pipeline_execution_id: input.pipeline_execution_id.clone().unwrap_or_default(),
            abandon: input.abandon.then_some(true),
            reason: input.reason.clone(),
        }
    }

    fn confirm_target(input: &Self::Input) -> String {
        format!(
            "{} / {}",
            input.pipeline_name.as_deref().unwrap_or_default(),
            input.pipeline_execution_id.as_deref().unwrap_or_default()
        )
    }
}

// ── DeletePipeline ──────────────────────────────────────────────────────

/// Delete a pipeline.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct DeletePipelineInput {
    /// Pipeline to delete.
    #[serde(rename = "Name")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletePipelineRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletePipelineResponse {}

pub struct DeletePipeline;

impl Operation for DeletePipeline {
    type Input = DeletePipelineInput;
    type Request = DeletePipelineRequest;
    type Response = DeletePipelineResponse;

    const NAME: &'static str = "DeletePipeline";
    const RESPONSE_FIELDS: &'static [&'static str] = &[];
    const PARAMETERS: &'static [&'static str] = &["Name"];
    const MUTATING: bool = true;
    const PASS_THRU: Option<&'static str> = Some("Name");

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        require_str("Name", &input.name)
    }

    fn build_request(input: &Self::Input) -> Self::Request {
        DeletePipelineRequest {
            name: input.name.clone().unwrap_or_default(),
        }
    }

    fn confirm_target(input: &Self::Input) -> String {
        input.name.clone().unwrap_or_default()
    }
}

json_operation!(
    ListPipelines,
    ListPipelineExecutions,
    ListActionExecutions,
    ListActionTypes,
    ListTagsForResource,
    GetPipeline,
    GetPipelineState,
    GetPipelineExecution,
    StartPipelineExecution,
    StopPipelineExecution,
    DeletePipeline,
);
