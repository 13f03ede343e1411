use clap::Parser;

use crate::config::DEFAULT_CACHE_BRANCH;

/// Arguments for fetch command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Fetch the default cache repo on master:\n    prebake fetch\n\n\
                  Fetch a specific cache branch:\n    prebake fetch --cache-branch release-1\n\n\
                  Fetch another repo from prebake.yaml:\n    prebake fetch --repo staging")]
pub struct FetchArgs {
    /// Name of the cache repo entry in the configuration file
    #[arg(long, default_value = "default")]
    pub repo: String,

    /// Branch of the remote cache repo to check out
    #[arg(long, default_value = DEFAULT_CACHE_BRANCH)]
    pub cache_branch: String,
}
