use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "Parameter Store synchronization tool", long_about = None)]
pub struct Args {
    /// Region to operate on. Defaults to AWS_REGION or the AWS provider chain.
    #[arg(long, short = 'r', global = true)]
    pub region: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a parameter, overwriting any existing value
    Put {
        /// Parameter name (e.g. /app/db/password)
        #[arg(long, short = 'n')]
        name: String,

        #[arg(long)]
        value: String,

        /// String, StringList or SecureString (plain, list and secret are accepted too)
        #[arg(long = "type", short = 't', default_value = "String")]
        parameter_type: String,

        #[arg(long, short = 'd')]
        description: Option<String>,
    },

    /// Print a parameter's decrypted value
    Get { name: String },

    /// Delete a parameter
    Delete { name: String },

    /// List every parameter in the region
    List {
        /// Resolve and print decrypted values as well
        #[arg(long)]
        with_values: bool,
    },

    /// Delete every parameter whose name contains PATTERN
    DeleteMatching {
        pattern: String,

        /// Delay between deletions in milliseconds (PARAM_SYNC_DELETE_PACING_MS)
        #[arg(long)]
        pacing_ms: Option<u64>,
    },

    /// Copy every parameter from one region to another
    CopyRegion {
        #[arg(long, short = 's')]
        source: String,

        #[arg(long, short = 'd')]
        destination: String,

        /// Delete each parameter from the source once it was copied
        #[arg(long)]
        delete_source: bool,
    },

    /// Store a JSON object of key/value pairs as parameters
    ///
    /// SOURCE accepts 'string://<JSON>', 'file:///path/to/doc.json',
    /// 'aws_secrets://<SECRET_NAME>', 'aws_parameter_store://<PARAMETER_NAME>'
    /// or a bare JSON string.
    BulkLoad {
        source: String,

        /// Prefix for every key (PARAM_SYNC_BULK_NAMESPACE)
        #[arg(long)]
        namespace: Option<String>,

        /// Type for every loaded parameter (PARAM_SYNC_BULK_TYPE)
        #[arg(long = "type", short = 't')]
        parameter_type: Option<String>,
    },

    /// Print the regions accepted by copy-region
    Regions,
}
