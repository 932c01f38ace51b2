/// Lambda関数の接続設定
use aws_sdk_dynamodb::Client as DynamoDbClient;
use thiserror::Error;

/// 設定読み込みのエラー型
#[derive(Debug, Error)]
pub enum ApiConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// DynamoDBクライアント、テーブル名、通知トピックARNを持つAPI設定
///
/// テーブル名とトピックARNは以下の環境変数で設定:
/// - USERS_TABLE: ユーザーレコード保存用テーブル
/// - TOPIC_ARN: ユーザー作成通知用SNSトピック
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// DynamoDBクライアントインスタンス
    client: DynamoDbClient,
    /// ユーザーテーブル名
    users_table: String,
    /// 通知トピックARN
    topic_arn: String,
}

impl ApiConfig {
    /// 環境からAWS設定を読み込み、環境変数からテーブル名とトピックARNを
    /// 読み取って新しいApiConfigを作成
    ///
    /// 環境変数:
    /// - AWS認証情報: aws-configにより自動読み込み
    /// - USERS_TABLE: ユーザー用DynamoDBテーブル名
    /// - TOPIC_ARN: ユーザー作成通知用SNSトピックARN
    pub async fn from_env() -> Result<Self, ApiConfigError> {
        // 環境からAWS設定を読み込み（認証情報、リージョンなど）
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        // AWS設定からDynamoDBクライアントを作成
        let client = DynamoDbClient::new(&aws_config);

        // 環境変数からテーブル名とトピックARNを読み込み
        let users_table = std::env::var("USERS_TABLE")
            .map_err(|_| ApiConfigError::MissingEnvVar("USERS_TABLE".to_string()))?;

        let topic_arn = std::env::var("TOPIC_ARN")
            .map_err(|_| ApiConfigError::MissingEnvVar("TOPIC_ARN".to_string()))?;

        Ok(Self {
            client,
            users_table,
            topic_arn,
        })
    }

    /// 明示的な値で新しいApiConfigを作成（テスト用）
    pub fn new(client: DynamoDbClient, users_table: String, topic_arn: String) -> Self {
        Self {
            client,
            users_table,
            topic_arn,
        }
    }

    /// DynamoDBクライアントへの参照を取得
    pub fn client(&self) -> &DynamoDbClient {
        &self.client
    }

    /// ユーザーテーブル名を取得
    pub fn users_table(&self) -> &str {
        &self.users_table
    }

    /// 通知トピックARNを取得
    pub fn topic_arn(&self) -> &str {
        &self.topic_arn
    }
}
