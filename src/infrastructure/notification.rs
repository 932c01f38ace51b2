//! 通知発行モジュール
//!
//! ユーザー作成イベントをSNSトピックへ発行する機能を提供する。
//! 発行はfire-and-forgetであり、配信確認や順序保証は行わない。

use async_trait::async_trait;
use aws_sdk_sns::Client as SnsClient;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// 通知発行のエラー型
#[derive(Debug, Error)]
pub enum NotificationError {
    /// AWS SDK エラー
    #[error("AWS SNS APIエラー: {0}")]
    PublishError(String),
    /// JSON シリアライズエラー
    #[error("JSONシリアライズエラー: {0}")]
    SerializeError(String),
}

/// 通知発行トレイト（テスト用の抽象化）
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    /// メッセージをSNSトピックに発行する
    ///
    /// # 引数
    /// * `topic_arn` - SNSトピックARN
    /// * `message` - 発行するメッセージ（JSON文字列）
    ///
    /// # 戻り値
    /// * `Ok(String)` - 発行されたメッセージID
    /// * `Err(NotificationError)` - エラー
    async fn publish(&self, topic_arn: &str, message: &str) -> Result<String, NotificationError>;

    /// シリアライズ可能な値をJSONとしてSNSトピックに発行する
    async fn publish_json<T: Serialize + Send + Sync>(
        &self,
        topic_arn: &str,
        value: &T,
    ) -> Result<String, NotificationError> {
        let message = serde_json::to_string(value)
            .map_err(|e| NotificationError::SerializeError(e.to_string()))?;

        self.publish(topic_arn, &message).await
    }
}

/// 実際のAWS SNS SDKを使用した通知発行実装
pub struct SnsNotificationPublisher {
    client: SnsClient,
}

impl SnsNotificationPublisher {
    /// 新しいSnsNotificationPublisherを作成
    pub fn new(client: SnsClient) -> Self {
        Self { client }
    }

    /// AWS設定からデフォルトのクライアントを作成
    pub async fn from_config() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = SnsClient::new(&config);
        Self::new(client)
    }
}

#[async_trait]
impl NotificationPublisher for SnsNotificationPublisher {
    async fn publish(&self, topic_arn: &str, message: &str) -> Result<String, NotificationError> {
        info!(
            topic_arn = %topic_arn,
            message_length = message.len(),
            "SNSメッセージ発行開始"
        );

        let result = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .message(message)
            .send()
            .await;

        match result {
            Ok(response) => {
                let message_id = response.message_id().unwrap_or("unknown").to_string();

                info!(
                    topic_arn = %topic_arn,
                    message_id = %message_id,
                    "SNS Publish成功"
                );

                Ok(message_id)
            }
            Err(err) => {
                warn!(
                    topic_arn = %topic_arn,
                    error = %err,
                    "SNS Publishエラー"
                );
                Err(NotificationError::PublishError(err.to_string()))
            }
        }
    }
}
