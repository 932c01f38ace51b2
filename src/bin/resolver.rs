/// GraphQLリゾルバーLambda関数
///
/// AppSyncからの操作ディスクリプター（fieldName + arguments）を受け取り、
/// getUser / createUserをDynamoDBユーザーテーブルに対して実行する。
/// createUser成功時はSNSトピックへ作成通知を発行する。
///
/// バックエンドサービスの失敗は変換せずランタイムへ伝播し、
/// API層がエラーレスポンスとして呼び出し元に返す。
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};
use user_api::application::ResolverHandler;
use user_api::infrastructure::{
    init_logging, ApiConfig, DynamoUserRepository, SnsNotificationPublisher,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    // Lambda関数を初期化して実行
    let func = service_fn(handler);
    lambda_runtime::run(func).await?;
    Ok(())
}

/// Lambda関数のメインハンドラー
///
/// # 処理フロー
/// 1. API設定を環境から読み込み
/// 2. リポジトリと通知発行を作成してハンドラーに注入
/// 3. ディスクリプターをディスパッチして結果JSONを返却
///
/// # 戻り値
/// * `Ok(Value)` - 操作結果（不在・未知操作はnull）
/// * `Err(Error)` - 設定エラーまたはバックエンド失敗
async fn handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    // 操作名を取得（ログ用）
    let field_name = event
        .payload
        .get("fieldName")
        .and_then(|f| f.as_str())
        .unwrap_or("unknown");

    info!(field_name = field_name, "リゾルバーイベント受信");

    // API設定を環境から読み込み
    let config = match ApiConfig::from_env().await {
        Ok(config) => config,
        Err(err) => {
            error!(field_name = field_name, error = %err, "API設定読み込み失敗");
            return Err(err.into());
        }
    };

    // リポジトリを作成
    let repository = DynamoUserRepository::new(
        config.client().clone(),
        config.users_table().to_string(),
    );

    // 通知発行を作成
    let publisher = SnsNotificationPublisher::from_config().await;

    // ハンドラーを構築してディスパッチ
    let resolver = ResolverHandler::new(repository, publisher, config.topic_arn().to_string());

    match resolver.handle(&event.payload).await {
        Ok(result) => {
            info!(field_name = field_name, "リゾルバー処理完了");
            Ok(result)
        }
        Err(err) => {
            error!(field_name = field_name, error = %err, "リゾルバー処理エラー");
            Err(err.into())
        }
    }
}
