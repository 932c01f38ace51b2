/// DynamoDBでユーザーレコードを管理するためのユーザーリポジトリ
///
/// ユーザーテーブルは複合キー`(pk, sk)`を持ち、両方の値にユーザーIDを
/// そのまま使用する（縮退複合キー）。アイテム構造:
/// - `pk` / `sk`: ユーザーID
/// - `data`: `{userId, username, email}`のネストマップ
/// - `entity`: 固定値 "USER"
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::domain::{UserProfile, USER_ENTITY};

/// ユーザーリポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserRepositoryError {
    /// DynamoDBへの書き込みに失敗
    #[error("Write error: {0}")]
    WriteError(String),

    /// DynamoDBからの読み取りに失敗
    #[error("Read error: {0}")]
    ReadError(String),

    /// 保存済みアイテムのデシリアライズに失敗
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

/// ユーザー永続化用トレイト
///
/// 異なる実装を可能にします（実際のDynamoDB、テスト用モック）。
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーIDでポイント読み取り
    ///
    /// # 戻り値
    /// * 見つかった場合は`Ok(Some(UserProfile))`
    /// * 見つからなかった場合は`Ok(None)`（レコード不在はエラーではない）
    /// * 失敗時は`Err(UserRepositoryError)`
    async fn get(&self, user_id: &str) -> Result<Option<UserProfile>, UserRepositoryError>;

    /// ユーザーレコードを無条件で上書き保存
    ///
    /// 同一IDの既存レコードは検出せず、常にlast-write-winsで置き換える。
    /// 条件付き書き込みも再試行も行わない。
    async fn put(&self, profile: &UserProfile) -> Result<(), UserRepositoryError>;
}

/// UserRepositoryのDynamoDB実装
#[derive(Debug, Clone)]
pub struct DynamoUserRepository {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// ユーザーテーブル名
    table_name: String,
}

impl DynamoUserRepository {
    /// 新しいDynamoUserRepositoryを作成
    ///
    /// # 引数
    /// * `client` - DynamoDBクライアント
    /// * `table_name` - ユーザーテーブルの名前
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// プロファイルから`data`属性のマップを構築
    fn build_data_attribute(profile: &UserProfile) -> AttributeValue {
        let mut data = HashMap::new();
        data.insert(
            "userId".to_string(),
            AttributeValue::S(profile.user_id.clone()),
        );
        data.insert(
            "username".to_string(),
            AttributeValue::S(profile.username.clone()),
        );
        data.insert("email".to_string(), AttributeValue::S(profile.email.clone()));
        AttributeValue::M(data)
    }

    /// アイテムの`data`属性からプロファイルを復元
    fn parse_data_attribute(
        item: &HashMap<String, AttributeValue>,
    ) -> Result<UserProfile, UserRepositoryError> {
        let data = item
            .get("data")
            .and_then(|v| v.as_m().ok())
            .ok_or_else(|| {
                UserRepositoryError::DeserializationError("Missing data attribute".to_string())
            })?;

        let field = |name: &str| -> Result<String, UserRepositoryError> {
            data.get(name)
                .and_then(|v| v.as_s().ok())
                .cloned()
                .ok_or_else(|| {
                    UserRepositoryError::DeserializationError(format!(
                        "Missing data field: {}",
                        name
                    ))
                })
        };

        Ok(UserProfile {
            user_id: field("userId")?,
            username: field("username")?,
            email: field("email")?,
        })
    }
}

#[async_trait]
impl UserRepository for DynamoUserRepository {
    async fn get(&self, user_id: &str) -> Result<Option<UserProfile>, UserRepositoryError> {
        debug!(user_id = user_id, table = %self.table_name, "ユーザー取得");

        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("pk", AttributeValue::S(user_id.to_string()))
            .key("sk", AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| UserRepositoryError::ReadError(e.into_service_error().to_string()))?;

        match result.item {
            Some(item) => Ok(Some(Self::parse_data_attribute(&item)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, profile: &UserProfile) -> Result<(), UserRepositoryError> {
        debug!(user_id = %profile.user_id, table = %self.table_name, "ユーザー保存");

        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("pk", AttributeValue::S(profile.user_id.clone()))
            .item("sk", AttributeValue::S(profile.user_id.clone()))
            .item("data", Self::build_data_attribute(profile))
            .item("entity", AttributeValue::S(USER_ENTITY.to_string()))
            .send()
            .await
            .map_err(|e| UserRepositoryError::WriteError(e.into_service_error().to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    // ==================== エラー型テスト ====================

    #[test]
    fn test_user_repository_error_write_error_display() {
        let error = UserRepositoryError::WriteError("throughput exceeded".to_string());
        assert_eq!(error.to_string(), "Write error: throughput exceeded");
    }

    #[test]
    fn test_user_repository_error_read_error_display() {
        let error = UserRepositoryError::ReadError("connection refused".to_string());
        assert_eq!(error.to_string(), "Read error: connection refused");
    }

    #[test]
    fn test_user_repository_error_deserialization_error_display() {
        let error = UserRepositoryError::DeserializationError("Missing data attribute".to_string());
        assert_eq!(
            error.to_string(),
            "Deserialization error: Missing data attribute"
        );
    }

    #[test]
    fn test_user_repository_error_equality() {
        assert_eq!(
            UserRepositoryError::WriteError("test".to_string()),
            UserRepositoryError::WriteError("test".to_string())
        );
        assert_ne!(
            UserRepositoryError::WriteError("test".to_string()),
            UserRepositoryError::ReadError("test".to_string())
        );
    }

    // ==================== data属性の構築/復元テスト ====================

    #[test]
    fn test_build_data_attribute() {
        let profile = UserProfile::new("u1", "alice", "a@example.com");
        let attr = DynamoUserRepository::build_data_attribute(&profile);

        let map = attr.as_m().unwrap();
        assert_eq!(map.get("userId").unwrap().as_s().unwrap(), "u1");
        assert_eq!(map.get("username").unwrap().as_s().unwrap(), "alice");
        assert_eq!(map.get("email").unwrap().as_s().unwrap(), "a@example.com");
    }

    #[test]
    fn test_parse_data_attribute_round_trip() {
        let profile = UserProfile::new("u1", "alice", "a@example.com");

        let mut item = HashMap::new();
        item.insert("pk".to_string(), AttributeValue::S("u1".to_string()));
        item.insert("sk".to_string(), AttributeValue::S("u1".to_string()));
        item.insert(
            "data".to_string(),
            DynamoUserRepository::build_data_attribute(&profile),
        );
        item.insert(
            "entity".to_string(),
            AttributeValue::S(USER_ENTITY.to_string()),
        );

        let parsed = DynamoUserRepository::parse_data_attribute(&item).unwrap();
        assert_eq!(parsed, profile);
    }

    // data属性が欠落したアイテムはデシリアライズエラー
    #[test]
    fn test_parse_data_attribute_missing() {
        let mut item = HashMap::new();
        item.insert("pk".to_string(), AttributeValue::S("u1".to_string()));

        let result = DynamoUserRepository::parse_data_attribute(&item);
        assert_eq!(
            result.unwrap_err(),
            UserRepositoryError::DeserializationError("Missing data attribute".to_string())
        );
    }

    // data属性内のフィールド欠落はデシリアライズエラー
    #[test]
    fn test_parse_data_attribute_missing_field() {
        let mut data = HashMap::new();
        data.insert("userId".to_string(), AttributeValue::S("u1".to_string()));

        let mut item = HashMap::new();
        item.insert("data".to_string(), AttributeValue::M(data));

        let result = DynamoUserRepository::parse_data_attribute(&item);
        assert_eq!(
            result.unwrap_err(),
            UserRepositoryError::DeserializationError("Missing data field: username".to_string())
        );
    }

    // ==================== モックユーザーリポジトリ ====================

    /// ユニットテスト用のモックUserRepository
    ///
    /// 保存されたレコードをインメモリに保持し、呼び出し履歴を記録する。
    /// `call_log`を共有することで、他のモックとの呼び出し順序を検証できる。
    #[derive(Debug, Clone)]
    pub struct MockUserRepository {
        /// 保存されたプロファイル: user_id -> UserProfile
        records: Arc<Mutex<HashMap<String, UserProfile>>>,
        /// 次の操作で返すエラー（エラーパスのテスト用）
        next_error: Arc<Mutex<Option<UserRepositoryError>>>,
        /// 操作の呼び出し履歴（順序検証用）
        call_log: Arc<Mutex<Vec<String>>>,
    }

    impl MockUserRepository {
        pub fn new() -> Self {
            Self {
                records: Arc::new(Mutex::new(HashMap::new())),
                next_error: Arc::new(Mutex::new(None)),
                call_log: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// 呼び出し履歴を共有するモックを作成
        pub fn with_call_log(call_log: Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                records: Arc::new(Mutex::new(HashMap::new())),
                next_error: Arc::new(Mutex::new(None)),
                call_log,
            }
        }

        pub fn set_next_error(&self, error: UserRepositoryError) {
            *self.next_error.lock().unwrap() = Some(error);
        }

        pub fn record_count(&self) -> usize {
            self.records.lock().unwrap().len()
        }

        pub fn get_record_sync(&self, user_id: &str) -> Option<UserProfile> {
            self.records.lock().unwrap().get(user_id).cloned()
        }

        pub fn calls(&self) -> Vec<String> {
            self.call_log.lock().unwrap().clone()
        }

        fn take_error(&self) -> Option<UserRepositoryError> {
            self.next_error.lock().unwrap().take()
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn get(&self, user_id: &str) -> Result<Option<UserProfile>, UserRepositoryError> {
            self.call_log.lock().unwrap().push(format!("get:{}", user_id));

            if let Some(error) = self.take_error() {
                return Err(error);
            }

            Ok(self.records.lock().unwrap().get(user_id).cloned())
        }

        async fn put(&self, profile: &UserProfile) -> Result<(), UserRepositoryError> {
            self.call_log
                .lock()
                .unwrap()
                .push(format!("put:{}", profile.user_id));

            if let Some(error) = self.take_error() {
                return Err(error);
            }

            self.records
                .lock()
                .unwrap()
                .insert(profile.user_id.clone(), profile.clone());
            Ok(())
        }
    }

    // ==================== モックリポジトリを使用したテスト ====================

    // 未書き込みIDの取得はNoneを返す（不在はエラーではない）
    #[tokio::test]
    async fn test_mock_repo_get_not_found() {
        let repo = MockUserRepository::new();

        let result = repo.get("missing").await.unwrap();
        assert!(result.is_none());
    }

    // put後のgetは保存した内容をそのまま返す（ラウンドトリップ）
    #[tokio::test]
    async fn test_mock_repo_put_get_round_trip() {
        let repo = MockUserRepository::new();
        let profile = UserProfile::new("u1", "alice", "a@example.com");

        repo.put(&profile).await.unwrap();

        let result = repo.get("u1").await.unwrap();
        assert_eq!(result, Some(profile));
    }

    // 同一IDへの2回のputはlast-write-wins
    #[tokio::test]
    async fn test_mock_repo_put_overwrites() {
        let repo = MockUserRepository::new();

        repo.put(&UserProfile::new("u1", "alice", "a@example.com"))
            .await
            .unwrap();
        repo.put(&UserProfile::new("u1", "alice2", "a2@example.com"))
            .await
            .unwrap();

        let result = repo.get("u1").await.unwrap().unwrap();
        assert_eq!(result.username, "alice2");
        assert_eq!(result.email, "a2@example.com");
        assert_eq!(repo.record_count(), 1);
    }

    // エラーパスのテスト
    #[tokio::test]
    async fn test_mock_repo_put_error() {
        let repo = MockUserRepository::new();
        repo.set_next_error(UserRepositoryError::WriteError(
            "DynamoDB unavailable".to_string(),
        ));

        let result = repo.put(&UserProfile::new("u1", "alice", "a@example.com")).await;

        assert_eq!(
            result.unwrap_err(),
            UserRepositoryError::WriteError("DynamoDB unavailable".to_string())
        );
        assert_eq!(repo.record_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_repo_get_error() {
        let repo = MockUserRepository::new();
        repo.set_next_error(UserRepositoryError::ReadError(
            "DynamoDB unavailable".to_string(),
        ));

        let result = repo.get("u1").await;
        assert!(result.is_err());
    }
}
