//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use qcompare_client::jobs::{DEFAULT_SHOTS, IONQ_PROVIDER};
use qcompare_core::{DescriptionScope, FilterForm, SortKey, StatusFilter};
use uuid::Uuid;

/// qcompare - rank, filter and compare quantum systems across providers
#[derive(Parser, Debug)]
#[command(name = "qcompare")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ~/.qcompare/config.yaml)
    #[arg(long, global = true, env = "QCOMPARE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read systems from a JSON export instead of the API
    #[arg(long, global = true)]
    pub systems_file: Option<PathBuf>,

    /// Read providers from a JSON export instead of the API
    #[arg(long, global = true)]
    pub providers_file: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List systems grouped by provider, filtered and ranked
    Systems(SystemsArgs),

    /// Show every known detail of one system
    System {
        /// System slug (e.g. "aria-1"), bid or id
        key: String,
    },

    /// List providers
    Providers,

    /// Show one provider and its systems
    Provider {
        /// Provider pid, id or name
        key: String,

        /// Which part of the description to print
        #[arg(long, value_enum, default_value_t = DescriptionPart::All)]
        description: DescriptionPart,
    },

    /// Compare two systems side by side
    CompareSystems {
        /// Pair slug, e.g. "aria-1-vs-ibm-kyoto"
        versus: String,

        /// Only print rows that differ
        #[arg(long)]
        only_differences: bool,
    },

    /// Compare two providers side by side
    CompareProviders {
        /// Pair slug, e.g. "native.ionq-vs-native.ibm"
        versus: String,
    },

    /// Inventory totals and the most recently checked systems
    Overview,

    /// Ask the service to re-fetch a provider's systems
    Refresh {
        /// Provider id whose systems should be refreshed
        provider_id: String,
    },

    /// Manage jobs on the inventory service
    Jobs {
        #[command(subcommand)]
        action: JobsAction,
    },

    /// Show version information
    Version,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionPart {
    Summary,
    History,
    All,
}

impl From<DescriptionPart> for DescriptionScope {
    fn from(part: DescriptionPart) -> Self {
        match part {
            DescriptionPart::Summary => DescriptionScope::Summary,
            DescriptionPart::History => DescriptionScope::History,
            DescriptionPart::All => DescriptionScope::All,
        }
    }
}

/// Arguments for `qcompare systems`.
#[derive(Args, Debug, Clone, Default)]
pub struct SystemsArgs {
    /// Status bucket (all, online, offline)
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,

    /// Sort key (qubits, queue, price)
    #[arg(long, default_value = "qubits")]
    pub sort: SortKey,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Page of provider groups to show (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,
}

/// Advanced filter flags, entered the same way as the filter form.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Minimum qubit count
    #[arg(long)]
    pub min_qubits: Option<String>,

    /// Comma-separated gates every system must support
    #[arg(long)]
    pub gates: Option<String>,

    /// Longest acceptable queue wait, e.g. "12hrs" (one of Nd, Nhrs, Nmin)
    #[arg(long)]
    pub max_queue_time: Option<String>,

    /// Most queued jobs acceptable
    #[arg(long)]
    pub max_queued_jobs: Option<String>,

    /// Highest acceptable price per task
    #[arg(long)]
    pub max_price_per_task: Option<String>,

    /// Highest acceptable price per shot
    #[arg(long)]
    pub max_price_per_shot: Option<String>,
}

impl FilterArgs {
    pub fn to_form(&self) -> FilterForm {
        FilterForm {
            qubits: self.min_qubits.clone().unwrap_or_default(),
            supported_gates: self.gates.clone().unwrap_or_default(),
            queue_time: self.max_queue_time.clone().unwrap_or_default(),
            queued_jobs: self.max_queued_jobs.clone().unwrap_or_default(),
            price_per_task: self.max_price_per_task.clone().unwrap_or_default(),
            price_per_shot: self.max_price_per_shot.clone().unwrap_or_default(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum JobsAction {
    /// List jobs
    List,

    /// Show one job
    Show {
        /// Job ID (UUID)
        id: Uuid,
    },

    /// Fetch the results of a finished job
    Results {
        /// Job ID (UUID)
        id: Uuid,
    },

    /// Submit a circuit
    Submit {
        /// Circuit file (JSON list of gate operations)
        #[arg(short, long)]
        circuit: PathBuf,

        /// Target system on the provider
        #[arg(short, long)]
        target: String,

        /// Number of qubits the circuit uses
        #[arg(short, long)]
        qubits: u32,

        /// Number of shots
        #[arg(short, long, default_value_t = DEFAULT_SHOTS)]
        shots: u32,

        /// Optional job name
        #[arg(long)]
        name: Option<String>,

        /// Provider routing key
        #[arg(long, default_value = IONQ_PROVIDER)]
        provider: String,
    },

    /// Delete a job
    Delete {
        /// Job ID (UUID)
        id: Uuid,
    },
}
