//! # Parameterized File Rewriter
//!
//! A fixed set of files in a freshly materialized project is customized from
//! the [`ProjectRequest`]. Each file is a [`RewriteTarget`] variant with its
//! own explicit transformation:
//!
//! - **Generated** targets (`.env`, `.env.production`) are written from
//!   scratch with a fixed key order. Whatever the template shipped at that
//!   path is discarded.
//! - **Substituted** targets (`index.html`, the main layout component) receive
//!   a small number of anchored replacements. When the file is absent the
//!   target is skipped.
//!
//! Rewriting is deliberately narrow: there is no general find/replace, only
//! the patterns named here.

use std::fmt;
use std::fs;
use std::path::Path;

use log::warn;
use regex::{NoExpand, Regex};

use crate::config::{EnvParams, ProjectRequest};
use crate::error::{Error, Result};

/// Component injected at the top of the main layout.
pub const LAYOUT_MARKER: &str = "<LayoutRestriccion />";

/// Which environment file to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvProfile {
    Local,
    Production,
}

/// A value in a generated environment file.
enum EnvValue {
    Fixed(&'static str),
    AppEnv,
    ApiUrl,
    DocumentoSector,
}

const LOCAL_ENV: &[(&str, EnvValue)] = &[
    ("APP_ENV", EnvValue::AppEnv),
    ("ISI_BASE_URL", EnvValue::Fixed("http://localhost:3002")),
    ("ISI_API_URL", EnvValue::ApiUrl),
    ("ISI_DOCUMENTO_SECTOR", EnvValue::DocumentoSector),
    ("ISI_CAPTCHA_KEY", EnvValue::Fixed("0x4AAAAAAAIR3qJWMFMaFVXX")),
    ("ISI_ASSETS_URL", EnvValue::Fixed("/assets/images/integrate")),
    (
        "ISI_FONDO",
        EnvValue::Fixed("/assets/images/integrate/fondo-login.jpg"),
    ),
    (
        "ISI_LOGO_FULL",
        EnvValue::Fixed("/assets/images/integrate/logo.png"),
    ),
    (
        "ISI_LOGO_MINI",
        EnvValue::Fixed("/assets/images/integrate/logo-mini.png"),
    ),
    ("ISI_NOMBRE_COMERCIAL", EnvValue::Fixed("ISI.INVOICE")),
    ("ISI_URL", EnvValue::Fixed("https://integrate.com.bo")),
    (
        "ISI_FAVICON",
        EnvValue::Fixed("/assets/images/integrate/favicon.ico"),
    ),
    ("ISI_THEME", EnvValue::Fixed("blue")),
];

const PRODUCTION_ENV: &[(&str, EnvValue)] = &[
    ("APP_ENV", EnvValue::Fixed("production")),
    ("ISI_BASE_URL", EnvValue::Fixed("dev.adm.isipass.com.bo")),
    ("ISI_API_URL", EnvValue::Fixed("https://sandbox.isipass.net/api")),
    ("ISI_ASSETS_URL", EnvValue::Fixed("/assets/integrate")),
    ("ISI_FONDO", EnvValue::Fixed("/assets/integrate/fondo-login.jpg")),
    ("ISI_LOGO_FULL", EnvValue::Fixed("/assets/integrate/logo.png")),
    ("ISI_LOGO_MINI", EnvValue::Fixed("/assets/integrate/logo-mini.png")),
    ("ISI_NOMBRE_COMERCIAL", EnvValue::Fixed("ISI.INVOICE")),
    ("ISI_URL", EnvValue::Fixed("https://integrate.com.bo")),
    ("ISI_FAVICON", EnvValue::Fixed("/assets/integrate/favicon.ico")),
    ("ISI_THEME", EnvValue::Fixed("blue1")),
    ("ISI_DOCUMENTO_SECTOR", EnvValue::DocumentoSector),
    ("ISI_CAPTCHA_KEY", EnvValue::Fixed("0x4AAAAAAAIR3qJWMFMaFVXX")),
];

impl EnvProfile {
    fn table(self) -> &'static [(&'static str, EnvValue)] {
        match self {
            EnvProfile::Local => LOCAL_ENV,
            EnvProfile::Production => PRODUCTION_ENV,
        }
    }
}

/// Render an environment file. The output depends only on the arguments.
pub fn render_env(profile: EnvProfile, params: &EnvParams) -> String {
    let mut content = String::new();
    for (key, value) in profile.table() {
        let value = match value {
            EnvValue::Fixed(fixed) => *fixed,
            EnvValue::AppEnv => params.app_env.as_str(),
            EnvValue::ApiUrl => params.api_url.as_str(),
            EnvValue::DocumentoSector => params.documento_sector.as_str(),
        };
        content.push_str(key);
        content.push('=');
        content.push_str(value);
        content.push('\n');
    }
    content
}

/// Escape text for use inside an HTML attribute or element.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Point the description meta tag and the document title at `project_name`.
///
/// Only the first occurrence of each is replaced.
pub fn rewrite_index_html(content: &str, project_name: &str) -> Result<String> {
    let name = escape_html(project_name);

    let meta = Regex::new(r#"<meta name="description" content="[^"]*""#)?;
    let replacement = format!(r#"<meta name="description" content="{}""#, name);
    let content = meta.replace(content, NoExpand(&replacement));

    let title = Regex::new(r"<title>[^<]*</title>")?;
    let replacement = format!("<title>{}</title>", name);
    let content = title.replace(&content, NoExpand(&replacement));

    Ok(content.into_owned())
}

/// Inject [`LAYOUT_MARKER`] right inside the layout's root render output.
///
/// Content that already contains the marker is returned unchanged, as is
/// content without a `return (<div` anchor.
pub fn inject_layout_marker(content: &str) -> Result<String> {
    if content.contains(LAYOUT_MARKER) {
        return Ok(content.to_string());
    }
    let anchor = Regex::new(r"return \(\s*<div")?;
    let replacement = format!("return (\n{}\n<div", LAYOUT_MARKER);
    Ok(anchor
        .replace(content, NoExpand(&replacement))
        .into_owned())
}

/// What happened to a rewrite target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The file was written from scratch
    Generated,
    /// The file existed and its content changed
    Rewritten,
    /// The file existed and needed no change
    Unchanged,
    /// The file does not exist in this template
    Skipped,
}

/// The files customized after the template is materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteTarget {
    LocalEnv,
    ProductionEnv,
    IndexHtml,
    Layout,
}

impl RewriteTarget {
    /// All targets, in application order.
    pub const ALL: [RewriteTarget; 4] = [
        RewriteTarget::LocalEnv,
        RewriteTarget::ProductionEnv,
        RewriteTarget::IndexHtml,
        RewriteTarget::Layout,
    ];

    /// Location relative to the project root.
    pub fn relative_path(self) -> &'static Path {
        Path::new(match self {
            RewriteTarget::LocalEnv => ".env",
            RewriteTarget::ProductionEnv => ".env.production",
            RewriteTarget::IndexHtml => "index.html",
            RewriteTarget::Layout => {
                "src/app/base/components/Template/MatxLayout/Layout1/Layout1.tsx"
            }
        })
    }

    /// Apply this target's transformation inside `project_root`.
    pub fn apply(self, project_root: &Path, request: &ProjectRequest) -> Result<RewriteOutcome> {
        let path = project_root.join(self.relative_path());
        match self {
            RewriteTarget::LocalEnv => {
                write_file(&path, &render_env(EnvProfile::Local, request.params()))?;
                Ok(RewriteOutcome::Generated)
            }
            RewriteTarget::ProductionEnv => {
                write_file(&path, &render_env(EnvProfile::Production, request.params()))?;
                Ok(RewriteOutcome::Generated)
            }
            RewriteTarget::IndexHtml => {
                substitute(&path, |content| rewrite_index_html(content, request.name()))
            }
            RewriteTarget::Layout => substitute(&path, inject_layout_marker),
        }
    }
}

impl fmt::Display for RewriteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relative_path().display())
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::Filesystem {
        message: format!("Failed to write file '{}': {}", path.display(), e),
    })
}

fn substitute<F>(path: &Path, transform: F) -> Result<RewriteOutcome>
where
    F: FnOnce(&str) -> Result<String>,
{
    if !path.is_file() {
        return Ok(RewriteOutcome::Skipped);
    }
    let bytes = fs::read(path).map_err(|e| Error::Filesystem {
        message: format!("Failed to read file '{}': {}", path.display(), e),
    })?;
    let original = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(_) => {
            warn!("{} is not valid UTF-8; left unchanged", path.display());
            return Ok(RewriteOutcome::Unchanged);
        }
    };
    let updated = transform(&original)?;
    if updated == original {
        return Ok(RewriteOutcome::Unchanged);
    }
    write_file(path, &updated)?;
    Ok(RewriteOutcome::Rewritten)
}
