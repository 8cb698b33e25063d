use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use nextcloud::config::ErrorDetection;
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DetectionMode {
    /// Check the HTTP status first, then the body
    StatusFirst,
    /// Treat any XML body as a potential error document
    BodySniff,
}

impl From<DetectionMode> for ErrorDetection {
    fn from(mode: DetectionMode) -> Self {
        match mode {
            DetectionMode::StatusFirst => ErrorDetection::StatusFirst,
            DetectionMode::BodySniff => ErrorDetection::BodySniff,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "nextcloud-cli", bin_name = "nextcloud-cli", version)]
#[command(about = "Upload and share files on a Nextcloud server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the Nextcloud instance
    #[arg(long, env = "NEXTCLOUD_URL", global = true, help_heading = "Connection")]
    pub url: Option<String>,

    /// Account name
    #[arg(long, env = "NEXTCLOUD_USERNAME", global = true, help_heading = "Connection")]
    pub username: Option<String>,

    /// Account password or app token
    #[arg(
        long,
        env = "NEXTCLOUD_PASSWORD",
        hide_env_values = true,
        global = true,
        help_heading = "Connection"
    )]
    pub password: Option<String>,

    /// Request timeout in seconds (0 disables it)
    #[arg(long, value_name = "SECS", global = true, help_heading = "Connection")]
    pub timeout: Option<u64>,

    /// How WebDAV errors are detected
    #[arg(
        long,
        value_enum,
        default_value_t = DetectionMode::StatusFirst,
        global = true,
        help_heading = "Connection"
    )]
    pub error_detection: DetectionMode,

    /// Print share results as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Files,
    Sharing,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Files => "File Commands:",
            CommandGroup::Sharing => "Sharing Commands:",
        }
    }

    /// Returns the group for a given command name
    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "upload" | "upload-dir" | "mkdir" | "rm" | "download" | "exists" => {
                Some(CommandGroup::Files)
            }
            "share" | "group-folder" => Some(CommandGroup::Sharing),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[CommandGroup::Files, CommandGroup::Sharing]
    }
}

/// Returns the grouped help output as a string
pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("nextcloud-cli {version}\n"));
    output.push_str("Upload and share files on a Nextcloud server\n");
    output.push('\n');
    output.push_str("Usage: nextcloud-cli [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();
    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<14} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Connection:\n");
    output.push_str("      --url <URL>            Base URL [env: NEXTCLOUD_URL]\n");
    output.push_str("      --username <NAME>      Account name [env: NEXTCLOUD_USERNAME]\n");
    output.push_str("      --password <PASS>      Password or app token [env: NEXTCLOUD_PASSWORD]\n");
    output.push_str("      --timeout <SECS>       Request timeout (0 disables it)\n");
    output.push_str("      --error-detection <M>  status-first (default) or body-sniff\n");
    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("      --json     Print share results as JSON\n");
    output.push_str("  -v, --verbose  Verbose output\n");
    output.push_str("  -h, --help     Print help\n");
    output.push_str("  -V, --version  Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Files(FileCommands),

    #[command(flatten)]
    Sharing(SharingCommands),
}

#[derive(Subcommand, Debug)]
pub enum FileCommands {
    /// Upload files, reporting failures and carrying on
    #[command(display_order = 1)]
    Upload {
        /// Remote directory to upload into (created if missing)
        #[arg(long, value_name = "DIR")]
        path: Option<String>,

        /// Stop at the first file that fails
        #[arg(long)]
        fail_fast: bool,

        /// Local files, relative to the current directory
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// Upload every file matching a glob pattern, stopping at the first failure
    #[command(display_order = 2)]
    UploadDir {
        /// Glob pattern, e.g. "reports/*.pdf"
        pattern: String,

        /// Remote directory
        dest: String,
    },

    /// Create a remote directory
    #[command(display_order = 3)]
    Mkdir { path: String },

    /// Delete a remote file or directory
    #[command(alias = "delete", display_order = 4)]
    Rm { path: String },

    /// Download a remote file
    #[command(display_order = 5)]
    Download {
        /// Remote file
        remote: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check whether a remote path exists
    #[command(display_order = 6)]
    Exists { path: String },
}

#[derive(Subcommand, Debug)]
pub enum SharingCommands {
    /// Create, list and delete public link shares
    #[command(display_order = 10)]
    Share {
        #[command(subcommand)]
        action: ShareAction,
    },

    /// Manage group folders
    #[command(display_order = 11)]
    GroupFolder {
        #[command(subcommand)]
        action: GroupFolderAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ShareAction {
    /// Create an upload-only public link
    Drop { path: String },

    /// Create a read-only public link
    ReadOnly { path: String },

    /// List the shares of a path
    #[command(alias = "ls")]
    List { path: String },

    /// Delete a share by id
    #[command(alias = "rm")]
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum GroupFolderAction {
    /// Create a group folder and optionally attach groups
    Create {
        /// Mount point of the new folder
        mount_point: String,

        /// Group to attach (repeatable)
        #[arg(long = "group", value_name = "GROUP")]
        groups: Vec<String>,

        /// Permission bits for the attached groups (1 read, 2 update, 4 create, 8 delete, 16 share)
        #[arg(long)]
        permissions: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("nextcloud-cli").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_command_parses() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert_eq!(cli.error_detection, DetectionMode::StatusFirst);
    }

    #[test]
    fn upload_with_target_and_global_flags() {
        let cli = parse(&[
            "upload",
            "--path",
            "Test",
            "a.txt",
            "b.txt",
            "--url",
            "https://cloud.example.com",
            "--fail-fast",
        ]);
        assert_eq!(cli.url.as_deref(), Some("https://cloud.example.com"));
        match cli.command {
            Some(Commands::Files(FileCommands::Upload {
                path,
                fail_fast,
                files,
            })) => {
                assert_eq!(path.as_deref(), Some("Test"));
                assert!(fail_fast);
                assert_eq!(files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn upload_requires_files() {
        assert!(Cli::try_parse_from(["nextcloud-cli", "upload"]).is_err());
    }

    #[test]
    fn share_subcommands() {
        let cli = parse(&["share", "read-only", "ShareTest"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Sharing(SharingCommands::Share {
                action: ShareAction::ReadOnly { .. }
            }))
        ));

        let cli = parse(&["share", "delete", "42"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Sharing(SharingCommands::Share {
                action: ShareAction::Delete { id: 42 }
            }))
        ));
    }

    #[test]
    fn group_folder_collects_groups() {
        let cli = parse(&[
            "group-folder",
            "create",
            "GroupFolder",
            "--group",
            "admin",
            "--group",
            "staff",
            "--permissions",
            "31",
        ]);
        match cli.command {
            Some(Commands::Sharing(SharingCommands::GroupFolder {
                action:
                    GroupFolderAction::Create {
                        mount_point,
                        groups,
                        permissions,
                    },
            })) => {
                assert_eq!(mount_point, "GroupFolder");
                assert_eq!(groups, vec!["admin", "staff"]);
                assert_eq!(permissions, Some(31));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn error_detection_flag() {
        let cli = parse(&["--error-detection", "body-sniff", "exists", "Test"]);
        assert_eq!(
            ErrorDetection::from(cli.error_detection),
            ErrorDetection::BodySniff
        );
    }

    #[test]
    fn grouped_help_lists_every_command() {
        let help = get_grouped_help();
        for name in [
            "upload",
            "upload-dir",
            "mkdir",
            "rm",
            "download",
            "exists",
            "share",
            "group-folder",
        ] {
            assert!(help.contains(name), "missing {name}");
        }
        assert!(help.contains("Usage: nextcloud-cli"));
    }
}
