//! Internationalization (i18n) module.
//!
//! Provides localized strings for the application UI and CLI output.
//! English is the default language; Spanish is available as an alternative.

use std::sync::OnceLock;

static CURRENT_LANG: OnceLock<Lang> = OnceLock::new();

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    /// English (default)
    En,
    /// Spanish
    Es,
}

impl Lang {
    /// Parse a language code string (e.g. "en", "es", "en_US", "es_ES").
    /// Returns `None` for unrecognized codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.to_lowercase();
        let prefix = normalized.split(['_', '-']).next().unwrap_or("");
        match prefix {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    /// Return the ISO 639-1 code for this language.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

/// Initialize the global language. Call once at startup.
/// If already initialized, this is a no-op.
pub fn set_lang(lang: Lang) {
    let _ = CURRENT_LANG.set(lang);
}

/// Get the currently configured language (defaults to English).
pub fn lang() -> Lang {
    CURRENT_LANG.get().copied().unwrap_or(Lang::En)
}

/// Detect language from `ATTACHSHELL_LANG`, then `LC_MESSAGES` / `LANG`.
pub fn detect_system_lang() -> Lang {
    std::env::var("ATTACHSHELL_LANG")
        .ok()
        .and_then(|v| Lang::from_code(&v))
        .or_else(|| {
            std::env::var("LC_MESSAGES")
                .ok()
                .and_then(|v| Lang::from_code(&v))
        })
        .or_else(|| std::env::var("LANG").ok().and_then(|v| Lang::from_code(&v)))
        .unwrap_or(Lang::En)
}

/// Macro for defining translatable message functions.
/// Each function returns a `&'static str` based on the current language.
macro_rules! msg {
    ($name:ident, $en:expr, $es:expr) => {
        /// Returns a localized string for the current language.
        pub fn $name() -> &'static str {
            match lang() {
                Lang::En => $en,
                Lang::Es => $es,
            }
        }
    };
}

// ── General ──────────────────────────────────────────────────────

msg!(app_name, "attachShell", "attachShell");
msg!(
    app_about,
    "attachShell \u{2014} Terminal browser for mail-archive attachments. Walk attachments by id, size or at random, skip small files and documents, page through images.",
    "attachShell \u{2014} Navegador de terminal para adjuntos de un archivo de correo. Recorre adjuntos por id, tama\u{f1}o o al azar, omite ficheros peque\u{f1}os y documentos, pagina im\u{e1}genes."
);
msg!(
    app_long_about,
    "attachShell \u{2014} Terminal browser for mail-archive attachments.\nConnects to the archive's HTTP API, walks attachments in id, size or\nrandom order with size and type filters, and pages through image grids.",
    "attachShell \u{2014} Navegador de terminal para adjuntos de un archivo de correo.\nSe conecta a la API HTTP del archivo, recorre adjuntos por id, tama\u{f1}o\no al azar con filtros de tama\u{f1}o y tipo, y pagina rejillas de im\u{e1}genes."
);
msg!(
    app_after_help,
    "Configuration: $ATTACHSHELL_CONFIG or ~/.config/attachshell/config.toml",
    "Configuraci\u{f3}n: $ATTACHSHELL_CONFIG o ~/.config/attachshell/config.toml"
);

// ── CLI help strings ─────────────────────────────────────────────

msg!(
    help_cmd_browse,
    "Browse attachments in the TUI (default if no subcommand given)",
    "Navegar por los adjuntos en la TUI (por defecto si no se da subcomando)"
);
msg!(
    help_cmd_show,
    "Resolve one attachment and print it",
    "Resolver un adjunto e imprimirlo"
);
msg!(
    help_cmd_walk,
    "Walk several attachments in a row",
    "Recorrer varios adjuntos seguidos"
);
msg!(
    help_cmd_images,
    "Print one page of the image listing",
    "Mostrar una p\u{e1}gina del listado de im\u{e1}genes"
);
msg!(
    help_cmd_download,
    "Download an attachment to disk",
    "Descargar un adjunto al disco"
);
msg!(
    help_cmd_delete,
    "Delete an attachment from the archive",
    "Borrar un adjunto del archivo"
);
msg!(
    help_cmd_config,
    "Print the effective configuration (--save writes it)",
    "Mostrar la configuraci\u{f3}n efectiva (--save la guarda)"
);
msg!(
    help_cmd_completions,
    "Generate shell completions",
    "Generar completions para tu shell"
);
msg!(
    help_cmd_manpage,
    "Generate a man page",
    "Generar p\u{e1}gina de manual"
);

// ── CLI output ───────────────────────────────────────────────────

msg!(msg_resolving, "Fetching attachment", "Obteniendo adjunto");
msg!(msg_downloading, "Downloading", "Descargando");
msg!(msg_loading_page, "Loading page", "Cargando p\u{e1}gina");
msg!(
    msg_no_attachments,
    "No attachments",
    "No hay adjuntos"
);
msg!(
    msg_no_match,
    "No attachments found matching your filter criteria",
    "No se encontraron adjuntos que cumplan los filtros"
);
msg!(
    msg_previous_disabled,
    "Previous is not available in random order",
    "Anterior no est\u{e1} disponible en orden aleatorio"
);
msg!(msg_saved_to, "Saved to", "Guardado en");
msg!(msg_deleted, "Deleted attachment", "Adjunto borrado");
msg!(msg_config_saved, "Config saved to", "Configuraci\u{f3}n guardada en");
msg!(msg_page, "Page", "P\u{e1}gina");
msg!(msg_of, "of", "de");

// ── Errors ───────────────────────────────────────────────────────

msg!(
    err_backend,
    "Could not reach the attachment server",
    "No se pudo contactar con el servidor de adjuntos"
);
msg!(
    err_delete_failed,
    "Delete failed",
    "Fall\u{f3} el borrado"
);
msg!(
    err_task_failed,
    "Background request failed unexpectedly",
    "La petici\u{f3}n en segundo plano fall\u{f3} inesperadamente"
);

// ── TUI Widget titles and labels ────────────────────────────────

msg!(tui_help_title, " Help ", " Ayuda ");
msg!(
    tui_help_description,
    "Terminal browser for mail-archive attachments",
    "Navegador de terminal para adjuntos de correo"
);
msg!(tui_attachment_title, " Attachment ", " Adjunto ");
msg!(tui_images_title, " Images ", " Im\u{e1}genes ");
msg!(tui_confirm_title, " Delete ", " Borrar ");
msg!(
    tui_confirm_delete,
    "Delete this attachment permanently? (y/n)",
    "\u{bf}Borrar este adjunto definitivamente? (s/n)"
);
msg!(tui_loading, "Loading...", "Cargando...");
msg!(tui_help_hint, " [?] Help ", " [?] Ayuda ");
msg!(tui_busy, "Working...", "Trabajando...");

// ── TUI record fields ───────────────────────────────────────────

msg!(tui_field_filename, "Filename: ", "Nombre:   ");
msg!(tui_field_type, "Type:     ", "Tipo:     ");
msg!(tui_field_size, "Size:     ", "Tama\u{f1}o:   ");
msg!(tui_field_id, "Id:       ", "Id:       ");
msg!(tui_field_subject, "Subject:  ", "Asunto:   ");
msg!(tui_field_from, "From:     ", "De:       ");
msg!(tui_field_date, "Date:     ", "Fecha:    ");
msg!(tui_field_folder, "Folder:   ", "Carpeta:  ");
msg!(tui_field_other, "Details", "Detalles");

// ── TUI header ──────────────────────────────────────────────────

msg!(tui_order, "order", "orden");
msg!(tui_offset, "offset", "posici\u{f3}n");
msg!(tui_min_size, "min", "m\u{ed}n");
msg!(tui_docs_shown, "docs shown", "docs visibles");
msg!(tui_docs_hidden, "docs hidden", "docs ocultos");
msg!(tui_all_types, "all types", "todos los tipos");
msg!(tui_images_only, "images only", "solo im\u{e1}genes");

// ── Table columns ───────────────────────────────────────────────

msg!(tui_col_filename, "Filename", "Nombre");
msg!(tui_col_type, "Type", "Tipo");
msg!(tui_col_size, "Size", "Tama\u{f1}o");
msg!(tui_col_subject, "Subject", "Asunto");
msg!(tui_col_id, "Id", "Id");

// ── Help popup ──────────────────────────────────────────────────

msg!(tui_help_viewer, "Attachment viewer", "Visor de adjuntos");
msg!(tui_help_filters, "Order & filters", "Orden y filtros");
msg!(tui_help_grid, "Image grid", "Rejilla de im\u{e1}genes");
msg!(tui_help_general, "General", "General");
msg!(tui_help_next, "Next", "Siguiente");
msg!(tui_help_previous, "Previous", "Anterior");
msg!(tui_help_reload, "Reload", "Recargar");
msg!(tui_help_delete, "Delete", "Borrar");
msg!(tui_help_save, "Save to disk", "Guardar en disco");
msg!(tui_help_cycle_order, "Cycle order", "Cambiar orden");
msg!(tui_help_min_size, "Min size", "Tama\u{f1}o m\u{ed}nimo");
msg!(tui_help_toggle_docs, "Show/hide docs", "Mostrar/ocultar docs");
msg!(tui_help_open_grid, "Image grid", "Rejilla");
msg!(tui_help_select, "Select", "Seleccionar");
msg!(tui_help_page, "Next/prev page", "P\u{e1}g. sig./ant.");
msg!(tui_help_direction, "Direction", "Direcci\u{f3}n");
msg!(tui_help_all_types, "All types", "Todos los tipos");
msg!(tui_help_back, "Back to viewer", "Volver al visor");
msg!(tui_help_this_help, "This help", "Esta ayuda");
msg!(tui_help_quit, "Quit", "Salir");
msg!(tui_help_force_quit, "Force quit", "Forzar salida");

// ── Status bar hints ────────────────────────────────────────────

msg!(tui_hint_next, "Next", "Sig");
msg!(tui_hint_prev, "Prev", "Ant");
msg!(tui_hint_order, "Order", "Orden");
msg!(tui_hint_filter, "Min size", "M\u{ed}n");
msg!(tui_hint_docs, "Docs", "Docs");
msg!(tui_hint_delete, "Delete", "Borrar");
msg!(tui_hint_save, "Save", "Guardar");
msg!(tui_hint_grid, "Grid", "Rejilla");
msg!(tui_hint_page, "Page", "P\u{e1}g");
msg!(tui_hint_direction, "Dir", "Dir");
msg!(tui_hint_all, "All", "Todo");
msg!(tui_hint_back, "Back", "Atr\u{e1}s");
msg!(tui_hint_help, "Help", "Ayuda");
msg!(tui_hint_quit, "Quit", "Salir");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_from_code() {
        assert_eq!(Lang::from_code("en"), Some(Lang::En));
        assert_eq!(Lang::from_code("es"), Some(Lang::Es));
        assert_eq!(Lang::from_code("en_US"), Some(Lang::En));
        assert_eq!(Lang::from_code("es_ES"), Some(Lang::Es));
        assert_eq!(Lang::from_code("es-MX"), Some(Lang::Es));
        assert_eq!(Lang::from_code("fr"), None);
    }

    #[test]
    fn test_lang_code_roundtrip() {
        assert_eq!(Lang::En.code(), "en");
        assert_eq!(Lang::Es.code(), "es");
    }

    #[test]
    fn test_messages_return_strings() {
        assert!(!app_name().is_empty());
        assert!(!msg_no_match().is_empty());
        assert!(!msg_no_attachments().is_empty());
        assert_ne!(msg_no_match(), msg_no_attachments());
    }
}
