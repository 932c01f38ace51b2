/// リゾルバーハンドラー
///
/// 操作ディスクリプターを受け取り、対応する操作へルーティングする
/// 単一のエントリーポイント。ステートレスな単発ディスパッチであり、
/// 呼び出し間で状態を共有しない。
///
/// - `getUser`: リポジトリのポイント取得結果をそのまま返却
/// - `createUser`: レコードを書き込み、作成通知を発行し、入力をエコー返却
/// - 未知の操作名: nullを返却（no-op、エラーではない）
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::application::operation::{Operation, OperationError, ResolverEvent};
use crate::domain::UserProfile;
use crate::infrastructure::{
    NotificationError, NotificationPublisher, UserRepository, UserRepositoryError,
};

/// リゾルバー処理のエラー型
///
/// バックエンドサービスの失敗はすべてここへ集約され、変換や再試行なしに
/// 呼び出し元（Lambdaランタイム）へ伝播する。
#[derive(Debug, Error)]
pub enum ResolverError {
    /// ディスクリプターまたは引数のパースエラー
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// レコードストアのエラー
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),

    /// 通知発行のエラー
    #[error(transparent)]
    Notification(#[from] NotificationError),

    /// レスポンスのシリアライズエラー
    #[error("response serialization error: {0}")]
    SerializationError(String),
}

/// 操作ディスクリプターを処理するハンドラー
///
/// リポジトリと通知発行は構築時に注入する（テストではモックに差し替え）。
pub struct ResolverHandler<R, P>
where
    R: UserRepository,
    P: NotificationPublisher,
{
    /// ユーザーリポジトリ
    repository: R,
    /// 通知発行
    publisher: P,
    /// 作成通知の発行先トピックARN
    topic_arn: String,
}

impl<R, P> ResolverHandler<R, P>
where
    R: UserRepository,
    P: NotificationPublisher,
{
    /// 新しいResolverHandlerを作成
    pub fn new(repository: R, publisher: P, topic_arn: String) -> Self {
        Self {
            repository,
            publisher,
            topic_arn,
        }
    }

    /// 操作ディスクリプターを処理
    ///
    /// # 処理フロー
    /// 1. ペイロードをディスクリプターとしてパース
    /// 2. 操作名を既知の操作へマッピング（未知ならnullを返却）
    /// 3. 操作固有の引数をパースして実行
    ///
    /// # 戻り値
    /// * `Ok(Value)` - 操作結果のJSON（不在・未知操作はnull）
    /// * `Err(ResolverError)` - 引数エラーまたはバックエンド失敗
    pub async fn handle(&self, payload: &Value) -> Result<Value, ResolverError> {
        let event = ResolverEvent::from_value(payload)?;

        match event.operation() {
            Some(Operation::GetUser) => self.get_user(&event).await,
            Some(Operation::CreateUser) => self.create_user(&event).await,
            None => {
                // 未知の操作はno-op
                info!(field_name = %event.field_name, "未知の操作名、nullを返却");
                Ok(Value::Null)
            }
        }
    }

    /// getUser: ユーザーのポイント取得
    ///
    /// レコード不在は正常な結果であり、nullとして返却する。
    async fn get_user(&self, event: &ResolverEvent) -> Result<Value, ResolverError> {
        let args = event.get_user_args()?;

        debug!(user_id = %args.user_id, "ユーザー取得開始");

        match self.repository.get(&args.user_id).await? {
            Some(profile) => {
                info!(user_id = %args.user_id, "ユーザー取得完了");
                Self::to_json(&profile)
            }
            None => {
                info!(user_id = %args.user_id, "ユーザー未存在");
                Ok(Value::Null)
            }
        }
    }

    /// createUser: ユーザー作成 + 作成通知
    ///
    /// # 処理順序
    /// 1. レコードストアへの書き込み（無条件上書き）
    /// 2. 作成通知の発行
    ///
    /// 書き込みは必ず発行より先に開始される。2つの副作用は
    /// トランザクションではない: 書き込み成功後に発行が失敗した場合、
    /// レコードはロールバックされずエラーのみが伝播する。
    async fn create_user(&self, event: &ResolverEvent) -> Result<Value, ResolverError> {
        let args = event.create_user_args()?;
        let profile = UserProfile::new(&args.user_id, &args.username, &args.email);

        debug!(user_id = %profile.user_id, "ユーザー作成開始");

        self.repository.put(&profile).await?;

        let message_id = self
            .publisher
            .publish_json(&self.topic_arn, &profile)
            .await?;

        info!(
            user_id = %profile.user_id,
            message_id = %message_id,
            "ユーザー作成完了"
        );

        Self::to_json(&profile)
    }

    /// プロファイルをレスポンスJSONへ変換
    fn to_json(profile: &UserProfile) -> Result<Value, ResolverError> {
        serde_json::to_value(profile).map_err(|e| ResolverError::SerializationError(e.to_string()))
    }
}
