use clap::error::ErrorKind;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::error;

use gitflow_finish::config::{RepoName, WorkflowConfig};
use gitflow_finish::github::GitHubClient;
use gitflow_finish::logging;
use gitflow_finish::version::BranchGrammar;
use gitflow_finish::workflow::FinishWorkflow;

#[derive(Parser)]
#[command(name = "gitflow-finish")]
#[command(version)]
#[command(about = "Finish a merged gitflow pull request by tagging the merge commit")]
#[command(
    long_about = "Finishes a merged gitflow pull request from a CI action: verifies the \
                  branch name encodes a semantic version, creates an annotated tag at the \
                  merge commit, and optionally merges the branch back into development \
                  and deletes it."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Finish a merged release or hotfix pull request
    Release {
        #[command(flatten)]
        common: CommonArgs,

        /// Text to prepend to the version when creating a tag
        #[arg(long = "tag-prefix", default_value = "v")]
        tag_prefix: String,

        /// Whether to delete the source branch after completing all gitflow actions
        #[arg(long = "del-source-branch", default_value_t = true, action = ArgAction::Set)]
        del_source_branch: bool,
    },
    /// Finish a merged release pull request on the feature track
    Feature {
        #[command(flatten)]
        common: CommonArgs,

        /// Whether to delete the release branch after completing all gitflow actions
        #[arg(long = "del-rel-branch", default_value_t = true, action = ArgAction::Set)]
        del_rel_branch: bool,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// The number of the pull request to finish
    #[arg(long = "pr-num")]
    pr_num: u64,

    /// Authentication token to allow the action to execute
    #[arg(long)]
    token: String,

    /// The full name of the containing repository in the form owner/repo
    #[arg(long = "repo-name")]
    repo_name: String,

    /// Whether to merge the source branch back into the development branch automatically
    #[arg(long = "merge-into-dev", default_value_t = false, action = ArgAction::Set)]
    merge_into_dev: bool,

    /// The name of the development branch to merge the source branch into
    #[arg(long = "dev-branch-name", default_value = "develop")]
    dev_branch_name: String,
}

fn main() {
    let log = match logging::init() {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("::error::Failed to initialize logging: {err}");
            std::process::exit(-1);
        }
    };

    let code = match Cli::try_parse() {
        Ok(cli) => execute(cli),
        Err(err) => {
            let _ = err.print();
            match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            }
        }
    };

    // Never leave a ::group:: unterminated, no matter how the run ended.
    log.close_open_group();
    std::process::exit(code);
}

/// Runs one finish workflow and converts its outcome into the process exit
/// status. This is the only place faults become exit codes.
fn execute(cli: Cli) -> i32 {
    let (common, tag_prefix, delete_source_branch) = match cli.command {
        Command::Release {
            common,
            tag_prefix,
            del_source_branch,
        } => (common, tag_prefix, del_source_branch),
        Command::Feature {
            common,
            del_rel_branch,
        } => (common, "v".to_string(), del_rel_branch),
    };

    let repository: RepoName = match common.repo_name.parse() {
        Ok(name) => name,
        Err(err) => {
            error!("{err}");
            return -1;
        }
    };

    let config = WorkflowConfig {
        repository: repository.clone(),
        pr_number: common.pr_num,
        merge_into_development: common.merge_into_dev,
        development_branch: common.dev_branch_name,
        delete_source_branch,
        tag_prefix,
        grammar: BranchGrammar::OptionalV,
    };
    let token = common.token;

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("Failed to start async runtime: {err}");
            return -1;
        }
    };

    runtime.block_on(async move {
        let host = match GitHubClient::new(token, repository) {
            Ok(host) => host,
            Err(err) => {
                error!("{err}");
                return -1;
            }
        };

        match FinishWorkflow::new(host, config).run().await {
            Ok(_) => 0,
            Err(err) => {
                error!("{err}");
                -1
            }
        }
    })
}
