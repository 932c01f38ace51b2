/// リゾルバー操作ディスクリプター
///
/// GraphQL APIから渡される呼び出しペイロード（操作名 + 引数マッピング）を
/// パースし、既知の操作の閉じた列挙型へマッピングする。
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// 操作ディスクリプターのパースエラー
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OperationError {
    /// ペイロードがディスクリプター形式でない
    #[error("invalid operation descriptor: {0}")]
    InvalidDescriptor(String),

    /// 引数マッピングが操作の要求する形と一致しない
    #[error("invalid arguments for {field_name}: {message}")]
    InvalidArguments { field_name: String, message: String },
}

/// 既知の操作
///
/// 操作名の文字列ディスパッチを閉じた列挙型として表現する。
/// 未知の操作名は`Operation::parse`が`None`を返し、呼び出し側は
/// エラーではなくnull結果として扱う（unknown operation is a no-op）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// ユーザーのポイント取得
    GetUser,
    /// ユーザーの作成（無条件上書き）+ 作成通知
    CreateUser,
}

impl Operation {
    /// 操作名文字列をパース
    ///
    /// # 戻り値
    /// * 既知の操作名なら`Some(Operation)`
    /// * それ以外は`None`
    pub fn parse(field_name: &str) -> Option<Self> {
        match field_name {
            "getUser" => Some(Operation::GetUser),
            "createUser" => Some(Operation::CreateUser),
            _ => None,
        }
    }
}

/// getUser操作の引数
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserArgs {
    /// 取得対象のユーザーID
    pub user_id: String,
}

/// createUser操作の引数
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserArgs {
    /// 作成するユーザーのID
    pub user_id: String,
    /// 表示名
    pub username: String,
    /// メールアドレス
    pub email: String,
}

/// 受信した操作ディスクリプター
///
/// フォーマット: `{"fieldName": <操作名>, "arguments": {<引数マッピング>}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverEvent {
    /// 操作名
    #[serde(rename = "fieldName")]
    pub field_name: String,
    /// 引数マッピング（操作ごとに形が異なるため、パースは操作決定後に行う）
    #[serde(default)]
    pub arguments: Value,
}

impl ResolverEvent {
    /// Lambdaペイロードから操作ディスクリプターをパース
    pub fn from_value(payload: &Value) -> Result<Self, OperationError> {
        serde_json::from_value(payload.clone())
            .map_err(|e| OperationError::InvalidDescriptor(e.to_string()))
    }

    /// 操作名を既知の操作へマッピング
    pub fn operation(&self) -> Option<Operation> {
        Operation::parse(&self.field_name)
    }

    /// getUser引数をパース
    pub fn get_user_args(&self) -> Result<GetUserArgs, OperationError> {
        self.parse_args()
    }

    /// createUser引数をパース
    pub fn create_user_args(&self) -> Result<CreateUserArgs, OperationError> {
        self.parse_args()
    }

    /// 引数マッピングを操作固有の型へデシリアライズ
    fn parse_args<T: for<'de> Deserialize<'de>>(&self) -> Result<T, OperationError> {
        serde_json::from_value(self.arguments.clone()).map_err(|e| {
            OperationError::InvalidArguments {
                field_name: self.field_name.clone(),
                message: e.to_string(),
            }
        })
    }
}
