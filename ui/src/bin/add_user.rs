//! Command-line client for the user creation endpoint.
//!
//! Runs the same validation and submission flow as the dashboard form: the
//! flash message is printed instead of shown on the listing page, toasts go
//! to stderr.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use anyhow::{bail, Context, Result};
    use clap::Parser;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    use dashboard_ui::api::ApiClient;
    use dashboard_ui::components::notifications::{Notifier, Toast};
    use dashboard_ui::config::Config;
    use dashboard_ui::form::{FormController, SubmitOutcome, UserForm};
    use dashboard_ui::navigation::Navigator;
    use dashboard_ui::storage::{MemoryStore, MessageStore};
    use dashboard_ui::types::{Photo, SubmissionResult};

    #[derive(Debug, Parser)]
    #[command(name = "add-user", about = "Create a dashboard user")]
    struct Args {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Profile photo; an empty placeholder file is sent when omitted
        #[arg(long)]
        photo: Option<PathBuf>,
        #[arg(long, default_value = "user")]
        role: String,
        /// Overrides DASHBOARD_API_URL
        #[arg(long)]
        api_url: Option<String>,
    }

    impl Args {
        fn into_form(self) -> Result<UserForm> {
            let photo = match &self.photo {
                Some(path) => read_photo(path)?,
                None => Photo::default(),
            };

            Ok(UserForm {
                username: self.username,
                email: self.email,
                password: self.password,
                photo: Some(photo),
                role: Some(self.role),
            })
        }
    }

    fn read_photo(path: &Path) -> Result<Photo> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read photo {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = match path.extension().and_then(|ext| ext.to_str()) {
            Some("png") => Some("image/png"),
            Some("jpg" | "jpeg") => Some("image/jpeg"),
            Some("webp") => Some("image/webp"),
            Some("gif") => Some("image/gif"),
            _ => None,
        };

        Ok(Photo::new(file_name, content_type.map(str::to_owned), bytes))
    }

    struct ConsoleNavigator;

    impl Navigator for ConsoleNavigator {
        fn navigate(&self, route: &str) {
            tracing::info!(route, "user created, listing page would open");
        }
    }

    struct ConsoleNotifier;

    impl Notifier for ConsoleNotifier {
        fn notify(&self, toast: Toast) {
            eprintln!("{}", toast.description);
        }
    }

    pub async fn run() -> Result<()> {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "dashboard_ui=info,add_user=info".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();

        let args = Args::parse();
        let mut config = Config::from_env()?;
        if let Some(url) = &args.api_url {
            config.api_base_url = url.clone();
        }
        let form = args.into_form()?;

        let store = Rc::new(MemoryStore::default());
        let controller = FormController::new(
            &config,
            ApiClient::new(&config),
            Rc::clone(&store),
            ConsoleNavigator,
            ConsoleNotifier,
        );

        match controller.submit(&form).await {
            SubmitOutcome::Invalid(errors) => {
                for (field, message) in errors.iter() {
                    eprintln!("{field}: {message}");
                }
                bail!("invalid input");
            }
            SubmitOutcome::Completed(SubmissionResult::Created { .. }) => {
                if let Some(message) = store.take(&config.flash_key)? {
                    println!("{message}");
                }
                Ok(())
            }
            SubmitOutcome::Completed(SubmissionResult::Failed { .. }) => {
                bail!("user was not created")
            }
            SubmitOutcome::Busy => bail!("a submission is already in flight"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    cli::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {}
