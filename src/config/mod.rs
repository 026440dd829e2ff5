// Re-export all items from the submodules
mod deploy_config;
mod env_vars;
mod package_config;

// Re-export deployment config
pub use deploy_config::{
    DeployConfig,
    ProviderConfig,
    load_config,
};

// Re-export packaging config
pub use package_config::{
    FunctionPackage,
    LayerPackage,
    PackageConfig,
    PackagingMode,
};

// Re-export environment variable functions
pub use env_vars::{
    expand_env_vars,
    expand_path,
};
