//! Report construction: checksum annotation plus JSON/HTML serialization.
//!
//! Duplicates are annotated, never removed — every target keeps its
//! checksum and suppression happens client-side, so JSON consumers always
//! see the raw collection.

use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use lineup_common::{checksum_hex, PhaseStatus, Target};

const CSS: &str =
    ".shot img { border: 1px solid black; max-width: 100%; } \
     html, body { padding: 10px; font-family: sans-serif; } \
     .controls { margin-bottom: 1em; } \
     .failure { color: #933; }";

const SCRIPT: &str = include_str!("../assets/report.js");

/// Fresh emits a complete standalone document; Append emits only the
/// per-target block fragment for accumulating multiple runs in one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlMode {
    Fresh,
    Append,
}

/// Compute the image checksum for every captured target. Pure function of
/// the image bytes, so identical renders always group together.
pub fn checksum_targets(targets: &mut [Target]) {
    for target in targets.iter_mut() {
        if let Some(ref image) = target.image {
            target.image_checksum = Some(checksum_hex(image));
        }
    }
}

/// Serialize the full target collection verbatim, incomplete and failed
/// entries included.
pub fn build_json(targets: &[Target]) -> Result<String> {
    Ok(serde_json::to_string_pretty(targets)?)
}

pub fn build_html(targets: &[Target], mode: HtmlMode) -> String {
    let mut out = String::new();

    if mode == HtmlMode::Fresh {
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str("<title>lineup report</title>\n");
        out.push_str(&format!("<style>{CSS}</style>\n"));
        out.push_str(&format!("<script>\n{SCRIPT}</script>\n"));
        out.push_str("</head>\n<body>\n");
        out.push_str(
            "<form class=\"controls\" onsubmit=\"return false;\">\n\
             sort by:\n\
             <button type=\"button\" onclick=\"sortBlocks('interest')\">interest</button>\n\
             <button type=\"button\" onclick=\"sortBlocks('hostname')\">hostname</button>\n\
             <button type=\"button\" onclick=\"sortBlocks('login')\">login</button>\n\
             <label><input type=\"checkbox\" onchange=\"hideDuplicates(this.checked)\"> \
             hide duplicates</label>\n\
             </form>\n<div id=\"container\">\n",
        );
    }

    for target in targets {
        push_block(&mut out, target);
    }

    if mode == HtmlMode::Fresh {
        out.push_str("</div>\n</body>\n</html>\n");
    }

    out
}

fn push_block(out: &mut String, target: &Target) {
    let hostname = target.hostname.as_deref().unwrap_or("");
    let checksum = target.image_checksum.as_deref().unwrap_or("");
    let login = if target.has_login_indicator { "true" } else { "false" };

    out.push_str(&format!(
        "<div class=\"shot\" data-interest=\"{}\" data-checksum=\"{}\" \
         data-login=\"{}\" data-hostname=\"{}\">\n",
        target.interest_score,
        checksum,
        login,
        escape_html(hostname),
    ));

    let requested = escape_html(&target.requested_url);
    out.push_str(&format!("<p><a href=\"{requested}\">{requested}</a></p>\n"));

    if let Some(ref resolved) = target.resolved_url {
        if *resolved != target.requested_url {
            let resolved = escape_html(resolved);
            out.push_str(&format!("<p>&#8658; <a href=\"{resolved}\">{resolved}</a></p>\n"));
        }
    }

    match (&target.image, target.profile_status, target.capture_status) {
        (Some(image), _, _) => {
            out.push_str(&format!(
                "<img src=\"data:image/png;base64,{}\" alt=\"{}\">\n",
                STANDARD.encode(image),
                escape_html(hostname),
            ));
        }
        (None, PhaseStatus::Failed, _) | (None, _, PhaseStatus::Failed) => {
            let reason = target.failure.as_deref().unwrap_or("unknown failure");
            out.push_str(&format!("<p class=\"failure\">{}</p>\n", escape_html(reason)));
        }
        (None, _, _) => {
            out.push_str("<p class=\"failure\">no screenshot</p>\n");
        }
    }

    out.push_str("</div>\n");
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
