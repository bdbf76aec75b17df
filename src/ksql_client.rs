//! ksqlDB REST API 执行器
//!
//! 通过 `POST {base}/ksql` 逐条提交语句，每条语句附带当前的属性快照
//! （`streamsProperties`）。使用阻塞客户端，保证上一条语句返回后才提交下一条。

use crate::connection::{ConnectionConfig, Credentials};
use crate::error::RunnerError;
use crate::executor::{ExecutionResult, StatementExecutor, StreamInfo};
use crate::statement::{PropertyMap, Statement};
use log::{debug, info};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const KSQL_MEDIA_TYPE: &str = "application/vnd.ksql.v1+json";
const KSQL_PATH: &str = "/ksql";
const LIST_STREAMS: &str = "LIST STREAMS;";

// 引擎在出错时返回的实体类型
const ERROR_ENTITY_TYPES: [&str; 2] = ["statement_error", "generic_error"];

#[derive(Serialize)]
struct KsqlRequest<'a> {
    ksql: &'a str,
    #[serde(rename = "streamsProperties")]
    streams_properties: &'a PropertyMap,
}

#[derive(Deserialize)]
struct StreamsEntity {
    #[serde(default)]
    streams: Vec<StreamInfo>,
}

/// ksqlDB REST 客户端
pub struct KsqlRestClient {
    base_url: String,
    credentials: Option<Credentials>,
    http_client: Client,
}

impl KsqlRestClient {
    pub fn new(config: &ConnectionConfig) -> Result<Self, RunnerError> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        let base_url = config.base_url();
        info!("Connecting to ksqlDB at {}", base_url);

        Ok(Self {
            base_url,
            credentials: config.credentials.clone(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn ksql_request(&self, url: &str, ksql: &str, properties: &PropertyMap) -> RequestBuilder {
        let body = KsqlRequest {
            ksql,
            streams_properties: properties,
        };

        let request = self
            .http_client
            .post(url)
            .header(ACCEPT, KSQL_MEDIA_TYPE)
            .header(CONTENT_TYPE, KSQL_MEDIA_TYPE)
            .json(&body);

        match &self.credentials {
            Some(credentials) => request.basic_auth(&credentials.key, credentials.secret.as_ref()),
            None => request,
        }
    }

    fn post_ksql(&self, ksql: &str, properties: &PropertyMap) -> Result<Vec<Value>, RunnerError> {
        let url = format!("{}{}", self.base_url, KSQL_PATH);
        let request = self.ksql_request(&url, ksql, properties);

        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;
        debug!("POST {} -> {}: {}", url, status, text);

        if !status.is_success() {
            return Err(RunnerError::Engine {
                statement: ksql.to_string(),
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let entities = decode_entities(&text)?;
        if let Some(message) = entities.iter().find_map(error_entity_message) {
            return Err(RunnerError::Engine {
                statement: ksql.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(entities)
    }
}

impl StatementExecutor for KsqlRestClient {
    fn execute(
        &mut self,
        statement: &Statement,
        properties: &PropertyMap,
    ) -> Result<ExecutionResult, RunnerError> {
        let entities = self.post_ksql(&statement.text, properties)?;
        Ok(execution_result(entities))
    }

    fn list_streams(&mut self) -> Result<Vec<StreamInfo>, RunnerError> {
        let entities = self.post_ksql(LIST_STREAMS, &PropertyMap::new())?;
        streams_from_entities(entities)
    }
}

/// 将响应体解码为实体数组
pub(crate) fn decode_entities(body: &str) -> Result<Vec<Value>, RunnerError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(entities)) => Ok(entities),
        Ok(other) => Ok(vec![other]),
        Err(e) => Err(RunnerError::Decode(format!("{}: '{}'", e, body))),
    }
}

/// 从非 2xx 响应体中提取错误消息，无法解析时返回原始文本
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn error_entity_message(entity: &Value) -> Option<String> {
    let entity_type = entity.get("@type").and_then(Value::as_str)?;
    if !ERROR_ENTITY_TYPES.contains(&entity_type) {
        return None;
    }
    let message = entity
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(entity_type);
    Some(message.to_string())
}

/// 从语句执行的响应实体中提取命令状态
pub(crate) fn execution_result(entities: Vec<Value>) -> ExecutionResult {
    let command_status = entities.iter().find_map(|e| e.get("commandStatus"));
    let field = |name: &str| {
        command_status
            .and_then(|s| s.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    ExecutionResult {
        query_id: field("queryId"),
        status: field("status"),
        message: field("message"),
        entities,
    }
}

/// 从 `LIST STREAMS;` 的响应实体中提取流列表
pub(crate) fn streams_from_entities(entities: Vec<Value>) -> Result<Vec<StreamInfo>, RunnerError> {
    let mut streams = Vec::new();
    for entity in entities {
        if entity.get("@type").and_then(Value::as_str) != Some("streams") {
            continue;
        }
        let parsed: StreamsEntity =
            serde_json::from_value(entity).map_err(|e| RunnerError::Decode(e.to_string()))?;
        streams.extend(parsed.streams);
    }
    Ok(streams)
}
