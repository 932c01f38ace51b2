/// ユーザーエンティティ
///
/// このAPIが扱う唯一のエンティティ。DynamoDBアイテムの`data`属性として
/// 保存され、そのままGraphQLレスポンスとして返却される。
use serde::{Deserialize, Serialize};

/// ユーザーアイテムのエンティティ種別タグ
///
/// 将来の複数エンティティテーブル化に備えた固定値。現時点では
/// フィルタリングにも検証にも使用しない。
pub const USER_ENTITY: &str = "USER";

/// ユーザープロファイル
///
/// `userId`をキーとして保存される属性構造。フィールド名はGraphQL側の
/// キャメルケース命名に合わせてシリアライズする。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// ユーザーID（呼び出し元が指定する不透明な文字列）
    pub user_id: String,
    /// 表示名
    pub username: String,
    /// メールアドレス
    pub email: String,
}

impl UserProfile {
    /// 新しいUserProfileを作成
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            email: email.into(),
        }
    }
}
