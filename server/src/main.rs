use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use warp::Filter;

use backend::attribution::store::{AttributionStore, FileStore, MemoryStore};
use backend::catalog::StaticCatalog;
use backend::config::{get_optional_variable, get_variable};
use backend::environment::Environment;
use backend::i18n::Translations;
use backend::routes;
use backend::urls::Urls;
use futures::future::FutureExt;
use log::{info, initialize_logger};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let logger = initialize_logger();

    let main_port: u16 = get_variable("BACKEND_PORT")
        .parse()
        .expect("parse BACKEND_PORT as u16");
    let admin_port: u16 = get_variable("BACKEND_ADMIN_PORT")
        .parse()
        .expect("parse BACKEND_ADMIN_PORT as u16");

    info!(logger, "Starting..."; "main_port" => main_port, "admin_port" => admin_port);
    let logger = Arc::new(logger);

    let catalog = Arc::new(StaticCatalog::new());

    let messages_dir = get_variable("BACKEND_MESSAGES_DIR");
    let translations = Arc::new(
        Translations::from_dir(&messages_dir).expect("load messages from BACKEND_MESSAGES_DIR"),
    );

    let attribution: Arc<dyn AttributionStore> =
        match get_optional_variable("BACKEND_ATTRIBUTION_PATH") {
            Some(path) => {
                info!(logger, "Using file-backed attribution store"; "path" => &path);
                Arc::new(FileStore::new(PathBuf::from(path)))
            }
            None => {
                info!(logger, "Using in-memory attribution store");
                Arc::new(MemoryStore::new())
            }
        };

    let urls = Arc::new(Urls::new(get_variable("BACKEND_PARTNER_URL")));

    let environment = Environment::new(logger.clone(), catalog, attribution, translations, urls);

    let (termination_sender, mut termination_receiver) = mpsc::channel::<()>(1);

    let terminate =
        Arc::new(move || {
            let termination_sender = termination_sender.clone();

            async move {
            let termination_sender = termination_sender.clone();
                termination_sender.send(()).await.unwrap();
            }
            .boxed()
        });

    let should_terminate = async move {
        termination_receiver.recv().await;
    }
    .shared();

    let ctrlc = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let signal = tokio::signal::ctrl_c();

        async move {
            let terminate = terminate.clone();

            tokio::select! {
                _ = should_terminate => {},
                _ = signal => {
                    terminate().await;
                }
            }
        }
    };

    let main_server = {
        let should_terminate = should_terminate.clone();

        let logger2 = logger.clone();

        let locale_redirect_route = routes::make_locale_redirect_route(environment.clone());
        let vibes_route = routes::make_vibes_route(environment.clone());
        let vibe_route = routes::make_vibe_route(environment.clone());
        let experiences_route = routes::make_experiences_route(environment.clone());
        let must_see_route = routes::make_must_see_route(environment.clone());
        let experience_route = routes::make_experience_route(environment.clone());
        let recommendations_route = routes::make_recommendations_route(environment.clone());
        let message_route = routes::make_message_route(environment.clone());
        let attribution_route = routes::make_attribution_route(environment.clone());
        let attribution_capture_route = routes::make_attribution_capture_route(environment.clone());
        let attribution_clear_route = routes::make_attribution_clear_route(environment.clone());
        let booking_route = routes::make_booking_route(environment.clone());

        let routes = locale_redirect_route
            .or(vibes_route)
            .or(vibe_route)
            .or(experiences_route)
            .or(must_see_route)
            .or(experience_route)
            .or(recommendations_route)
            .or(message_route)
            .or(attribution_capture_route)
            .or(attribution_clear_route)
            .or(attribution_route)
            .or(booking_route)
            .recover(move |r| routes::format_rejection(logger2.clone(), r));

        let (_, main_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], main_port), async {
                should_terminate.await;
            });

        main_server
    };

    let admin_server = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let routes = routes::admin::make_healthz_route(environment.clone()).or(
            routes::admin::make_termination_route(environment.clone(), terminate),
        );

        let (_, admin_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], admin_port), async {
                should_terminate.await;
            });

        admin_server
    };

    tokio::join!(ctrlc, main_server, admin_server);

    info!(logger, "Exiting gracefully...");

    Ok(())
}
