//! The UniTok stack

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::environment::DeployTarget;
use crate::error::StackResult;
use crate::resources::{
    Access, ApiMethod, ApiResource, Architecture, Attribute, AttributeType, BillingMode,
    BucketDeploymentSpec, BucketSpec, Bundling, CorsPreflight, DistributionSpec, ErrorResponse,
    FunctionSpec, GlobalSecondaryIndex, KeyAttribute, LayerVersionSpec, ProjectionType,
    RemovalPolicy, Resource, ResourceId, RestApiSpec, Runtime, SubstitutedFileSpec, TableSpec,
    Token, ViewerProtocolPolicy,
};
use crate::stack::Stack;
use crate::substitution;

pub const STACK_NAME: &str = "UniTokStack";
pub const STACK_DESCRIPTION: &str = "Unified stack for UniTok social media platform";

/// Object key of the runtime configuration in the site bucket
pub const CONFIG_KEY: &str = "config.json";

/// `config.json` as deployed, before substitution
pub const CONFIG_TEMPLATE: &str = r#"{"apiEndpoint":"{{ apiEndpoint }}"}"#;

pub const TIMESTAMP_INDEX_NAME: &str = "TimestampIndex";

/// Lambda architecture of the functions and the layer
pub const ARCHITECTURE: Architecture = Architecture::Arm64;

const FUNCTION_TIMEOUT_SECS: u32 = 30;
const FUNCTION_MEMORY_MB: u32 = 256;

/// Local paths the stack packages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assets {
    pub get_posts: PathBuf,
    pub publish_post: PathBuf,
    pub site: PathBuf,
    pub layer: PathBuf,
}

impl Assets {
    /// Default layout relative to the workspace root
    #[must_use]
    pub fn from_root(root: &Path) -> Self {
        Self {
            get_posts: root.join("target/lambda/get-posts"),
            publish_post: root.join("target/lambda/publish-post"),
            site: root.join("frontend/site"),
            layer: root.join("layers/strands"),
        }
    }
}

/// Logical ids of the declared resources
#[derive(Debug, Clone)]
pub struct UniTokResources {
    pub table: ResourceId,
    pub publish_post: ResourceId,
    pub get_posts: ResourceId,
    pub api: ResourceId,
    pub bucket: ResourceId,
    pub distribution: ResourceId,
    pub deploy_website: ResourceId,
    pub deploy_config: ResourceId,
    pub layer: ResourceId,
}

fn posts_table() -> Resource {
    Resource::Table(TableSpec {
        partition_key: KeyAttribute::new("postId", AttributeType::String),
        billing_mode: BillingMode::PayPerRequest,
        point_in_time_recovery: true,
        global_secondary_indexes: vec![GlobalSecondaryIndex {
            index_name: TIMESTAMP_INDEX_NAME.to_string(),
            // Always "POST"
            partition_key: KeyAttribute::new("dummy", AttributeType::String),
            sort_key: Some(KeyAttribute::new("timestamp", AttributeType::Number)),
            projection_type: ProjectionType::All,
        }],
        removal_policy: RemovalPolicy::Destroy,
    })
}

fn function(code: &Path, table: &ResourceId, access: Access) -> Resource {
    let environment = BTreeMap::from([
        ("POSTS_TABLE".to_string(), table.reference()),
        ("TIMESTAMP_INDEX_NAME".to_string(), Token::literal(TIMESTAMP_INDEX_NAME)),
        ("APP_ENV".to_string(), Token::literal("production")),
        (
            "AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH".to_string(),
            Token::literal("true"),
        ),
    ]);

    Resource::Function(
        FunctionSpec {
            runtime: Runtime::ProvidedAl2023,
            handler: "bootstrap".to_string(),
            architectures: vec![ARCHITECTURE],
            code: code.to_path_buf(),
            environment,
            timeout: FUNCTION_TIMEOUT_SECS,
            memory_size: FUNCTION_MEMORY_MB,
            grants: Vec::new(),
        }
        .grant(table, access),
    )
}

fn api(get_posts: &ResourceId, publish_post: &ResourceId) -> RestApiSpec {
    RestApiSpec {
        name: "UniTok API".to_string(),
        description: "API for UniTok social media platform".to_string(),
        stage_name: "prod".to_string(),
        default_cors_preflight: CorsPreflight::allow_all(),
        resources: vec![ApiResource {
            path_part: "posts".to_string(),
            methods: vec![
                ApiMethod::lambda_proxy("GET", get_posts),
                ApiMethod::lambda_proxy("POST", publish_post),
            ],
        }],
    }
}

fn distribution(bucket: &ResourceId) -> Resource {
    Resource::Distribution(DistributionSpec {
        origin: bucket.reference(),
        viewer_protocol_policy: ViewerProtocolPolicy::RedirectToHttps,
        allowed_methods: vec!["GET".to_string(), "HEAD".to_string()],
        cache_policy: "CachingOptimized".to_string(),
        default_root_object: "index.html".to_string(),
        custom_error_responses: vec![ErrorResponse {
            error_code: 404,
            response_code: 200,
            response_page_path: "/index.html".to_string(),
        }],
    })
}

/// Declares the whole stack: table, API, site, layer, then outputs
///
/// # Errors
///
/// Returns a `StackError` if the declarations do not form a valid graph
pub fn unitok_stack(
    target: DeployTarget,
    assets: &Assets,
) -> StackResult<(Stack, UniTokResources)> {
    let mut stack = Stack::new(STACK_NAME, STACK_DESCRIPTION, target);

    // Database
    let table = stack.add("PostsTable", posts_table())?;

    // API
    let publish_post = stack.add(
        "PublishPostFunction",
        function(&assets.publish_post, &table, Access::ReadWrite),
    )?;
    let get_posts = stack.add(
        "GetPostsFunction",
        function(&assets.get_posts, &table, Access::Read),
    )?;
    let api_spec = api(&get_posts, &publish_post);
    let api = stack.add("UniTokApi", Resource::RestApi(api_spec.clone()))?;
    let api_url = api_spec.url(&api);

    // Frontend
    let bucket = stack.add(
        "WebsiteBucket",
        Resource::Bucket(BucketSpec {
            block_public_access: true,
            auto_delete_objects: true,
            removal_policy: RemovalPolicy::Destroy,
        }),
    )?;
    let distribution = stack.add("Distribution", distribution(&bucket))?;
    let deploy_website = stack.add(
        "DeployWebsite",
        Resource::BucketDeployment(BucketDeploymentSpec {
            source: assets.site.clone(),
            destination_bucket: bucket.reference(),
            exclude: vec![CONFIG_KEY.to_string()],
            distribution: Some(distribution.reference()),
            distribution_paths: vec!["/*".to_string()],
        }),
    )?;

    let substitutions = BTreeMap::from([("apiEndpoint".to_string(), api_url.clone())]);
    substitution::check(CONFIG_TEMPLATE, substitutions.keys().map(String::as_str))?;
    let deploy_config = stack.add(
        "DeployConfig",
        Resource::SubstitutedFile(SubstitutedFileSpec {
            template: CONFIG_TEMPLATE.to_string(),
            destination_bucket: bucket.reference(),
            destination_key: CONFIG_KEY.to_string(),
            substitutions,
        }),
    )?;
    // The website copy must not overwrite the rendered config
    stack.add_dependency(&deploy_config, &deploy_website)?;

    // Agent dependencies layer
    let layer = stack.add(
        "StrandsLayer",
        Resource::LayerVersion(LayerVersionSpec {
            content: assets.layer.clone(),
            bundling: Bundling::python_requirements(Runtime::Python311, ARCHITECTURE),
            compatible_runtimes: vec![Runtime::Python311],
            compatible_architectures: vec![ARCHITECTURE],
            description: "Dependencies for Strands Agents".to_string(),
        }),
    )?;

    stack.add_output(
        "Strandslayer",
        layer.reference(),
        "The ARN of the Strands layer version",
    )?;
    stack.add_output(
        "PostsTableName",
        table.reference(),
        "The name of the posts table",
    )?;
    stack.add_output(
        "PostsTableArn",
        table.attr(Attribute::Arn),
        "The ARN of the posts table",
    )?;
    stack.add_output("ApiEndpoint", api_url, "The endpoint URL of the UniTok API")?;
    stack.add_output(
        "DistributionDomainName",
        distribution.attr(Attribute::DomainName),
        "The domain name of the CloudFront distribution",
    )?;

    stack.tag("Project", "UniTok");
    stack.tag("Workshop", "AsyncAgentsWorkshop");

    Ok((
        stack,
        UniTokResources {
            table,
            publish_post,
            get_posts,
            api,
            bucket,
            distribution,
            deploy_website,
            deploy_config,
            layer,
        },
    ))
}
