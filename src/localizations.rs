use std::collections::HashMap;

use i18n_embed::DesktopLanguageRequester;
use unic_langid::{langid, LanguageIdentifier};

// Simple in-memory translations
#[derive(Default)]
pub struct Translations {
    strings: HashMap<&'static str, &'static str>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &'static str, value: &'static str) {
        self.strings.insert(key, value);
    }

    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.strings.get(key).copied()
    }
}

pub struct Localizations {
    translations: Vec<(LanguageIdentifier, Translations)>,
    current: usize,
}

impl Localizations {
    /// Picks `preferred` if given, otherwise the desktop's requested languages.
    pub fn new(preferred: Option<&str>) -> Self {
        let mut localizer = Self::with_fallback();
        let requested = match preferred.and_then(|p| p.parse::<LanguageIdentifier>().ok()) {
            Some(lang) => vec![lang],
            None => DesktopLanguageRequester::requested_languages(),
        };
        localizer.select(&requested);
        localizer
    }

    fn with_fallback() -> Self {
        let mut en = Translations::new();
        en.insert("app-title", "YouTube Downloader");
        en.insert("download-button", "Download");
        en.insert("update-button", "Update yt-dlp");
        en.insert("download-type", "Download Type:");
        en.insert("kind-video", "Video");
        en.insert("kind-audio", "Audio");
        en.insert("video-quality", "Video Quality:");
        en.insert("audio-quality", "Audio Quality:");
        en.insert("url-label", "YouTube URL:");
        en.insert("url-placeholder", "Enter YouTube URL");
        en.insert("download-to", "Save Location:");
        en.insert("dir-placeholder", "Select download directory");
        en.insert("browse-button", "Browse");
        en.insert("status-ready", "Ready");
        en.insert("status-starting", "Starting download...");
        en.insert("status-updating", "Updating yt-dlp...");
        en.insert("progress-label", "Progress:");
        en.insert("saved-to", "Saved to:");
        en.insert("error-prefix", "Error:");

        let mut es = Translations::new();
        es.insert("app-title", "Descargador de YouTube");
        es.insert("download-button", "Descargar");
        es.insert("update-button", "Actualizar yt-dlp");
        es.insert("download-type", "Tipo de descarga:");
        es.insert("kind-video", "Video");
        es.insert("kind-audio", "Audio");
        es.insert("video-quality", "Calidad de video:");
        es.insert("audio-quality", "Calidad de audio:");
        es.insert("url-label", "URL de YouTube:");
        es.insert("url-placeholder", "Ingrese la URL de YouTube");
        es.insert("download-to", "Guardar en:");
        es.insert("dir-placeholder", "Seleccione la carpeta de descarga");
        es.insert("browse-button", "Examinar");
        es.insert("status-ready", "Listo");
        es.insert("status-starting", "Iniciando descarga...");
        es.insert("status-updating", "Actualizando yt-dlp...");
        es.insert("progress-label", "Progreso:");
        es.insert("saved-to", "Guardado en:");
        es.insert("error-prefix", "Error:");

        Self {
            translations: vec![(langid!("en-US"), en), (langid!("es-ES"), es)],
            current: 0,
        }
    }

    /// First requested language whose primary subtag we ship wins; English otherwise.
    pub fn select(&mut self, requested: &[LanguageIdentifier]) {
        self.current = requested
            .iter()
            .find_map(|want| {
                self.translations
                    .iter()
                    .position(|(have, _)| have.language == want.language)
            })
            .unwrap_or(0);
    }

    pub fn current_language(&self) -> &LanguageIdentifier {
        &self.translations[self.current].0
    }

    pub fn lookup(&self, key: &str) -> Option<String> {
        self.translations[self.current]
            .1
            .lookup(key)
            .or_else(|| self.translations[0].1.lookup(key))
            .map(str::to_string)
    }

    /// Missing keys render as the key itself.
    pub fn text(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_else(|| key.to_string())
    }
}
