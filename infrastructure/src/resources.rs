//! Typed resource declarations
//!
//! Every resource serializes to a `{"Type": ..., "Properties": ...}` object. References to
//! other resources are [`Token`]s and serialize as `Ref` / `Fn::GetAtt` intrinsics, which is
//! also how the graph discovers edges.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{ser::SerializeMap, Serialize, Serializer};
use strum::Display;

/// Logical id of a declared resource
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(pub(crate) String);

impl ResourceId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Ref` to this resource (the physical name or id)
    #[must_use]
    pub fn reference(&self) -> Token {
        Token::Ref(self.clone())
    }

    /// `Fn::GetAtt` on this resource
    #[must_use]
    pub fn attr(&self, attribute: Attribute) -> Token {
        Token::GetAtt(self.clone(), attribute)
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attributes readable with `Fn::GetAtt`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Attribute {
    Arn,
    DomainName,
}

/// Account-level values known only to the provisioning engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Pseudo {
    #[strum(serialize = "AWS::Region")]
    Region,
    #[strum(serialize = "AWS::URLSuffix")]
    UrlSuffix,
}

/// A value resolved at provisioning time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Ref(ResourceId),
    GetAtt(ResourceId, Attribute),
    Pseudo(Pseudo),
    /// Concatenation of the parts
    Join(Vec<Token>),
}

impl Token {
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Literal(value) => serializer.serialize_str(value),
            Self::Ref(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", id.as_str())?;
                map.end()
            }
            Self::GetAtt(id, attribute) => {
                let attribute = attribute.to_string();
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[id.as_str(), attribute.as_str()])?;
                map.end()
            }
            Self::Pseudo(pseudo) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", &pseudo.to_string())?;
                map.end()
            }
            Self::Join(parts) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Join", &("", parts))?;
                map.end()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RemovalPolicy {
    Destroy,
    Retain,
}

impl RemovalPolicy {
    /// Value of the resource-level `DeletionPolicy`
    #[must_use]
    pub const fn deletion_policy(self) -> &'static str {
        match self {
            Self::Destroy => "Delete",
            Self::Retain => "Retain",
        }
    }
}

/// Key attribute type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttributeType {
    #[serde(rename = "S")]
    String,
    #[serde(rename = "N")]
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyAttribute {
    pub attribute_name: String,
    pub attribute_type: AttributeType,
}

impl KeyAttribute {
    #[must_use]
    pub fn new(name: &str, attribute_type: AttributeType) -> Self {
        Self {
            attribute_name: name.to_string(),
            attribute_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingMode {
    PayPerRequest,
    Provisioned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectionType {
    All,
    KeysOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSecondaryIndex {
    pub index_name: String,
    pub partition_key: KeyAttribute,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<KeyAttribute>,
    pub projection_type: ProjectionType,
}

/// A `DynamoDB` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableSpec {
    pub partition_key: KeyAttribute,
    pub billing_mode: BillingMode,
    pub point_in_time_recovery: bool,
    pub global_secondary_indexes: Vec<GlobalSecondaryIndex>,
    #[serde(skip)]
    pub removal_policy: RemovalPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum Runtime {
    #[serde(rename = "provided.al2023")]
    #[strum(serialize = "provided.al2023")]
    ProvidedAl2023,
    #[serde(rename = "python3.11")]
    #[strum(serialize = "python3.11")]
    Python311,
}

impl Runtime {
    /// Container image used to bundle assets for this runtime
    #[must_use]
    pub const fn bundling_image(self) -> &'static str {
        match self {
            Self::ProvidedAl2023 => "public.ecr.aws/sam/build-provided.al2023",
            Self::Python311 => "public.ecr.aws/sam/build-python3.11",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Architecture {
    #[serde(rename = "arm64")]
    Arm64,
    #[serde(rename = "x86_64")]
    X86_64,
}

impl Architecture {
    /// pip `--platform` tag of wheels built for this architecture
    #[must_use]
    pub const fn wheel_platform(self) -> &'static str {
        match self {
            Self::Arm64 => "manylinux2014_aarch64",
            Self::X86_64 => "manylinux2014_x86_64",
        }
    }
}

/// Table access granted to a function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    ReadWrite,
}

impl Access {
    const READ_ACTIONS: [&'static str; 8] = [
        "dynamodb:BatchGetItem",
        "dynamodb:GetRecords",
        "dynamodb:GetShardIterator",
        "dynamodb:Query",
        "dynamodb:GetItem",
        "dynamodb:Scan",
        "dynamodb:ConditionCheckItem",
        "dynamodb:DescribeTable",
    ];

    const WRITE_ACTIONS: [&'static str; 4] = [
        "dynamodb:BatchWriteItem",
        "dynamodb:PutItem",
        "dynamodb:UpdateItem",
        "dynamodb:DeleteItem",
    ];

    #[must_use]
    pub fn actions(self) -> Vec<&'static str> {
        match self {
            Self::Read => Self::READ_ACTIONS.to_vec(),
            Self::ReadWrite => Self::READ_ACTIONS
                .iter()
                .chain(Self::WRITE_ACTIONS.iter())
                .copied()
                .collect(),
        }
    }
}

/// IAM statement allowing `access` on a table and its indexes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableGrant {
    pub table: ResourceId,
    pub access: Access,
}

impl Serialize for TableGrant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let table_arn = self.table.attr(Attribute::Arn);
        let index_arns = Token::Join(vec![table_arn.clone(), Token::literal("/index/*")]);

        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("Effect", "Allow")?;
        map.serialize_entry("Action", &self.access.actions())?;
        map.serialize_entry("Resource", &[table_arn, index_arns])?;
        map.end()
    }
}

/// A Lambda function built from a local asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionSpec {
    pub runtime: Runtime,
    pub handler: String,
    pub architectures: Vec<Architecture>,
    /// Directory holding the deployment package
    pub code: PathBuf,
    pub environment: BTreeMap<String, Token>,
    /// Seconds
    pub timeout: u32,
    /// Megabytes
    pub memory_size: u32,
    #[serde(rename = "Policies")]
    pub grants: Vec<TableGrant>,
}

impl FunctionSpec {
    /// Grants `access` on `table` to this function
    #[must_use]
    pub fn grant(mut self, table: &ResourceId, access: Access) -> Self {
        self.grants.push(TableGrant {
            table: table.clone(),
            access,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CorsPreflight {
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
}

impl CorsPreflight {
    /// All origins and all methods
    #[must_use]
    pub fn allow_all() -> Self {
        Self {
            allow_origins: vec!["*".to_string()],
            allow_methods: vec!["*".to_string()],
        }
    }
}

/// A method on an API resource, proxied to a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiMethod {
    pub http_method: String,
    pub integration: Token,
}

impl ApiMethod {
    #[must_use]
    pub fn lambda_proxy(http_method: &str, function: &ResourceId) -> Self {
        Self {
            http_method: http_method.to_string(),
            integration: function.attr(Attribute::Arn),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiResource {
    pub path_part: String,
    pub methods: Vec<ApiMethod>,
}

/// A REST API with a single deployment stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RestApiSpec {
    pub name: String,
    pub description: String,
    pub stage_name: String,
    pub default_cors_preflight: CorsPreflight,
    pub resources: Vec<ApiResource>,
}

impl RestApiSpec {
    /// `https://{api}.execute-api.{region}.{suffix}/{stage}/`
    #[must_use]
    pub fn url(&self, api: &ResourceId) -> Token {
        Token::Join(vec![
            Token::literal("https://"),
            api.reference(),
            Token::literal(".execute-api."),
            Token::Pseudo(Pseudo::Region),
            Token::literal("."),
            Token::Pseudo(Pseudo::UrlSuffix),
            Token::literal(format!("/{}/", self.stage_name)),
        ])
    }
}

/// A private bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketSpec {
    pub block_public_access: bool,
    pub auto_delete_objects: bool,
    #[serde(skip)]
    pub removal_policy: RemovalPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewerProtocolPolicy {
    RedirectToHttps,
    AllowAll,
    HttpsOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorResponse {
    pub error_code: u16,
    pub response_code: u16,
    pub response_page_path: String,
}

/// A CDN distribution in front of a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionSpec {
    pub origin: Token,
    pub viewer_protocol_policy: ViewerProtocolPolicy,
    pub allowed_methods: Vec<String>,
    pub cache_policy: String,
    pub default_root_object: String,
    pub custom_error_responses: Vec<ErrorResponse>,
}

/// Copies a local directory into a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketDeploymentSpec {
    pub source: PathBuf,
    pub destination_bucket: Token,
    pub exclude: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Token>,
    pub distribution_paths: Vec<String>,
}

/// Writes a single object rendered from a template at deploy time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubstitutedFileSpec {
    pub template: String,
    pub destination_bucket: Token,
    pub destination_key: String,
    pub substitutions: BTreeMap<String, Token>,
}

/// Container command that produces the asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bundling {
    pub image: String,
    pub command: Vec<String>,
}

impl Bundling {
    /// Installs `requirements.txt` into `/asset-output/python` for the target platform
    #[must_use]
    pub fn python_requirements(runtime: Runtime, architecture: Architecture) -> Self {
        let script = [
            format!(
                "pip install --no-cache-dir -r requirements.txt --only-binary=:all: --platform {} -t /asset-output/python",
                architecture.wheel_platform()
            ),
            "cp -r . /asset-output".to_string(),
        ]
        .join(" && ");

        Self {
            image: runtime.bundling_image().to_string(),
            command: vec!["bash".to_string(), "-c".to_string(), script],
        }
    }
}

/// A Lambda layer built in a bundling container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LayerVersionSpec {
    pub content: PathBuf,
    pub bundling: Bundling,
    pub compatible_runtimes: Vec<Runtime>,
    pub compatible_architectures: Vec<Architecture>,
    pub description: String,
}

/// Every resource kind a stack can declare
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "Type", content = "Properties")]
pub enum Resource {
    #[serde(rename = "AWS::DynamoDB::Table")]
    Table(TableSpec),
    #[serde(rename = "AWS::Lambda::Function")]
    Function(FunctionSpec),
    #[serde(rename = "AWS::ApiGateway::RestApi")]
    RestApi(RestApiSpec),
    #[serde(rename = "AWS::S3::Bucket")]
    Bucket(BucketSpec),
    #[serde(rename = "AWS::CloudFront::Distribution")]
    Distribution(DistributionSpec),
    #[serde(rename = "Custom::CDKBucketDeployment")]
    BucketDeployment(BucketDeploymentSpec),
    #[serde(rename = "Custom::DeployTimeSubstitutedFile")]
    SubstitutedFile(SubstitutedFileSpec),
    #[serde(rename = "AWS::Lambda::LayerVersion")]
    LayerVersion(LayerVersionSpec),
}

impl Resource {
    #[must_use]
    pub const fn removal_policy(&self) -> Option<RemovalPolicy> {
        match self {
            Self::Table(spec) => Some(spec.removal_policy),
            Self::Bucket(spec) => Some(spec.removal_policy),
            _ => None,
        }
    }
}
