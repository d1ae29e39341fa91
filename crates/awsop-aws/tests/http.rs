//! Wire behaviour of `AwsClient` against a local HTTP server.

use aws_credential_types::provider::SharedCredentialsProvider;
use aws_credential_types::Credentials;
use awsop_aws::codepipeline::{
    DeletePipeline, DeletePipelineInput, GetPipeline, GetPipelineInput, ListPipelineExecutions,
    ListPipelineExecutionsInput, StartPipelineExecution, StartPipelineExecutionInput,
};
use awsop_aws::geoplaces::{GetPlace, GetPlaceInput, SearchText, SearchTextInput};
use awsop_aws::{AwsClient, ClientSettings};
use awsop_core::{
    AutoConfirm, CancellationToken, ConfirmError, ConfirmGate, ConfirmRequest, InvocationError,
    InvocationOptions, InvocationStatus, Runner,
};
use httpmock::prelude::*;
use serde_json::{json, Value};

const TARGET: &str = "x-amz-target";

fn client(endpoint: &str) -> AwsClient {
    let settings = ClientSettings {
        region: Some("us-east-1".into()),
        endpoint_url: Some(endpoint.to_string()),
        ..Default::default()
    };
    let creds = Credentials::new("AKIDEXAMPLE", "secret", None, None, "test");
    AwsClient::new(settings, SharedCredentialsProvider::new(creds)).unwrap()
}

fn executions_input() -> ListPipelineExecutionsInput {
    ListPipelineExecutionsInput {
        pipeline_name: Some("build".into()),
        ..Default::default()
    }
}

struct Refuse;

impl ConfirmGate for Refuse {
    fn confirm(&self, _request: &ConfirmRequest) -> Result<bool, ConfirmError> {
        Ok(false)
    }
}

#[tokio::test]
async fn aws_json_request_is_signed_and_targeted() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .header(TARGET, "CodePipeline_20150709.GetPipeline")
                .header("content-type", "application/x-amz-json-1.1")
                .header_exists("authorization")
                .header_exists("x-amz-date")
                .json_body(json!({ "name": "build" }));
            then.status(200).json_body(json!({
                "pipeline": { "name": "build", "version": 2, "stages": [] },
                "metadata": { "pipelineArn": "arn:aws:codepipeline:us-east-1:123:build" }
            }));
        })
        .await;

    let client = client(&server.base_url());
    let input = GetPipelineInput {
        name: Some("build".into()),
        version: None,
    };
    let mut runner = Runner::new(&client, &AutoConfirm, Vec::<Value>::new(), CancellationToken::new());
    let report = runner
        .run_single::<GetPipeline>(&input, &InvocationOptions::default())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(report.calls, 1);
    let out: Vec<Value> = runner.into_sink();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["name"], "build");
    assert_eq!(out[0]["version"], 2);
}

#[tokio::test]
async fn paging_round_trips_the_token() {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method(POST)
                .header(TARGET, "CodePipeline_20150709.ListPipelineExecutions")
                .json_body(json!({ "pipelineName": "build" }));
            then.status(200).json_body(json!({
                "pipelineExecutionSummaries": [
                    { "pipelineExecutionId": "e-1", "status": "Succeeded" },
                    { "pipelineExecutionId": "e-2", "status": "Failed" }
                ],
                "nextToken": "t-1"
            }));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(POST)
                .header(TARGET, "CodePipeline_20150709.ListPipelineExecutions")
                .json_body(json!({ "pipelineName": "build", "nextToken": "t-1" }));
            then.status(200).json_body(json!({
                "pipelineExecutionSummaries": [
                    { "pipelineExecutionId": "e-3", "status": "InProgress" }
                ]
            }));
        })
        .await;

    let client = client(&server.base_url());
    let mut runner = Runner::new(&client, &AutoConfirm, Vec::<Value>::new(), CancellationToken::new());
    let report = runner
        .run_paged::<ListPipelineExecutions>(&executions_input(), &InvocationOptions::default())
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(report.status, InvocationStatus::Completed);
    assert_eq!(report.calls, 2);
    assert_eq!(report.items, 3);
    let ids: Vec<Value> = runner
        .into_sink()
        .iter()
        .flat_map(|page| page.as_array().cloned().unwrap_or_default())
        .map(|item| item["pipelineExecutionId"].clone())
        .collect();
    assert_eq!(ids, vec![json!("e-1"), json!("e-2"), json!("e-3")]);
}

#[tokio::test]
async fn budget_sets_page_size_and_stops() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .json_body(json!({ "pipelineName": "build", "maxResults": 1 }));
            then.status(200).json_body(json!({
                "pipelineExecutionSummaries": [{ "pipelineExecutionId": "e-1" }],
                "nextToken": "t-1"
            }));
        })
        .await;

    let client = client(&server.base_url());
    let options = InvocationOptions {
        max_items: Some(1),
        ..Default::default()
    };
    let mut runner = Runner::new(&client, &AutoConfirm, Vec::<Value>::new(), CancellationToken::new());
    let report = runner
        .run_paged::<ListPipelineExecutions>(&executions_input(), &options)
        .await
        .unwrap();

    assert_eq!(mock.hits_async().await, 1);
    assert_eq!(report.status, InvocationStatus::Truncated);
    assert_eq!(report.resume_token.as_deref(), Some("t-1"));
}

#[tokio::test]
async fn service_error_carries_code_and_request_id() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).header(TARGET, "CodePipeline_20150709.GetPipeline");
            then.status(400)
                .header("x-amzn-RequestId", "req-42")
                .json_body(json!({
                    "__type": "com.amazonaws.codepipeline#PipelineNotFoundException",
                    "message": "Account '123' does not have a pipeline with name 'nope'"
                }));
        })
        .await;

    let client = client(&server.base_url());
    let input = GetPipelineInput {
        name: Some("nope".into()),
        version: None,
    };
    let mut runner = Runner::new(&client, &AutoConfirm, Vec::<Value>::new(), CancellationToken::new());
    let err = runner
        .run_single::<GetPipeline>(&input, &InvocationOptions::default())
        .await
        .unwrap_err();

    match err {
        InvocationError::Service(e) => {
            assert_eq!(e.code, "PipelineNotFoundException");
            assert_eq!(e.status_code, 400);
            assert_eq!(e.request_id.as_deref(), Some("req-42"));
            assert_eq!(e.action.as_deref(), Some("GetPipeline"));
        }
        other => panic!("expected a service error, got {other:?}"),
    }
}

#[tokio::test]
async fn rest_error_code_comes_from_header() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v2/search-text");
            then.status(400)
                .header(
                    "x-amzn-ErrorType",
                    "ValidationException:http://internal.amazon.com/coral/com.amazonaws.geoplaces/",
                )
                .json_body(json!({ "Message": "BiasPosition or Filter is required" }));
        })
        .await;

    let client = client(&server.base_url());
    let input = SearchTextInput {
        query_text: Some("coffee".into()),
        ..Default::default()
    };
    let mut runner = Runner::new(&client, &AutoConfirm, Vec::<Value>::new(), CancellationToken::new());
    let err = runner
        .run_paged::<SearchText>(&input, &InvocationOptions::default())
        .await
        .unwrap_err();

    match err {
        InvocationError::Service(e) => {
            assert_eq!(e.code, "ValidationException");
            assert_eq!(e.service, "geo-places");
            assert_eq!(e.message, "BiasPosition or Filter is required");
        }
        other => panic!("expected a service error, got {other:?}"),
    }
}

#[tokio::test]
async fn get_place_sends_path_and_key() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/place/p-1")
                .query_param("key", "v1.public.abc")
                .query_param("language", "de");
            then.status(200).json_body(json!({
                "PlaceId": "p-1",
                "PlaceType": "PointOfInterest",
                "Title": "Cafe Central",
                "TimeZone": { "Name": "Europe/Vienna" }
            }));
        })
        .await;

    let client = client(&server.base_url());
    let input = GetPlaceInput {
        place_id: Some("p-1".into()),
        language: Some("de".into()),
        key: Some("v1.public.abc".into()),
        ..Default::default()
    };
    let options = InvocationOptions {
        select: Some("timezone".into()),
        ..Default::default()
    };
    let mut runner = Runner::new(&client, &AutoConfirm, Vec::<Value>::new(), CancellationToken::new());
    runner.run_single::<GetPlace>(&input, &options).await.unwrap();

    mock.assert_async().await;
    assert_eq!(runner.into_sink(), vec![json!({ "Name": "Europe/Vienna" })]);
}

#[tokio::test]
async fn empty_success_body_is_accepted() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).header(TARGET, "CodePipeline_20150709.DeletePipeline");
            then.status(200);
        })
        .await;

    let client = client(&server.base_url());
    let input = DeletePipelineInput {
        name: Some("old".into()),
    };
    let options = InvocationOptions {
        force: true,
        pass_thru: true,
        ..Default::default()
    };
    let mut runner = Runner::new(&client, &AutoConfirm, Vec::<Value>::new(), CancellationToken::new());
    let report = runner
        .run_single::<DeletePipeline>(&input, &options)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(report.status, InvocationStatus::Completed);
    assert_eq!(runner.into_sink(), vec![json!("old")]);
}

#[tokio::test]
async fn declined_mutation_never_reaches_the_server() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({ "pipelineExecutionId": "e-9" }));
        })
        .await;

    let client = client(&server.base_url());
    let input = StartPipelineExecutionInput {
        name: Some("build".into()),
        ..Default::default()
    };
    let mut runner = Runner::new(&client, &Refuse, Vec::<Value>::new(), CancellationToken::new());
    let report = runner
        .run_single::<StartPipelineExecution>(&input, &InvocationOptions::default())
        .await
        .unwrap();

    assert_eq!(report.status, InvocationStatus::Declined);
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn unreachable_endpoint_is_named() {
    let client = client("http://127.0.0.1:1");
    let mut runner = Runner::new(&client, &AutoConfirm, Vec::<Value>::new(), CancellationToken::new());
    let err = runner
        .run_paged::<ListPipelineExecutions>(&executions_input(), &InvocationOptions::default())
        .await
        .unwrap_err();

    match err {
        InvocationError::Service(e) => {
            assert!(e.is_unreachable(), "{e}");
            assert!(e.message.contains("http://127.0.0.1:1"), "{}", e.message);
            assert!(e.message.contains("region"));
        }
        other => panic!("expected a service error, got {other:?}"),
    }
}
