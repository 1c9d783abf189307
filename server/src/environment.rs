use std::sync::Arc;

use log::Logger;

use crate::attribution::store::AttributionStore;
use crate::catalog::Catalog;
use crate::i18n::Translations;
use crate::urls::Urls;

/// Everything a route handler needs, cloned into each filter.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub catalog: Arc<dyn Catalog>,
    pub attribution: Arc<dyn AttributionStore>,
    pub translations: Arc<Translations>,
    pub urls: Arc<Urls>,
}

impl Environment {
    pub fn new(
        logger: Arc<Logger>,
        catalog: Arc<dyn Catalog>,
        attribution: Arc<dyn AttributionStore>,
        translations: Arc<Translations>,
        urls: Arc<Urls>,
    ) -> Self {
        Self {
            logger,
            catalog,
            attribution,
            translations,
            urls,
        }
    }
}
