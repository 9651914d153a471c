//! HTML fragments for each screen of the quest.
//!
//! Every mutating route re-renders the current screen into `#quest-screen`.
//! Transient UI (slider position, description draft, save-button enablement)
//! is owned by Alpine.js `x-data`; authoritative state is only what the
//! routes write through [`Quest`](crate::quest::state::Quest).

use crate::config::QuestConfig;
use crate::quest::sections::{SectionInfo, SectionKey};
use crate::quest::state::{QuestState, SectionRecord};
use crate::quest::steps::{self, Phase, Screen};
use crate::routes::util::{error_html, escape_html, escape_js_attr};

/// Swap target for whole screens.
pub const SCREEN_TARGET: &str = "#quest-screen";
/// Swap target for the body of a venue flow.
pub const SECTION_TARGET: &str = "#section-body";
const ALBUM_STATUS_TARGET: &str = "#album-status";
/// Element the host rasterizes for the PNG download.
pub const ALBUM_CAPTURE_ID: &str = "album-capture";
pub const ALBUM_DOWNLOAD_NAME: &str = "valentine-quest-2026.png";
const ALBUM_DOWNLOAD_FAILED: &str = "Gagal download album \u{1F622} Coba screenshot aja ya!";

const BUTTON_PRIMARY: &str = "w-full py-3.5 text-sm font-medium tracking-wide text-white bg-quest-red rounded";
const BUTTON_DISABLED: &str = "disabled:bg-quest-sand disabled:text-quest-mute disabled:cursor-not-allowed";
const HEADING: &str = "text-2xl font-normal font-serif text-quest-ink";
const EYEBROW: &str = "text-xs tracking-[0.2em] uppercase text-quest-mute mb-3";

/// Render whatever screen the current step points at.
pub fn render_screen(state: &QuestState, config: &QuestConfig) -> String {
    let step = state.current_step;
    let screen = Screen::for_step(step);
    let mut html = String::with_capacity(4096);

    if screen.shows_back(step) {
        html.push_str(&format!(
            r#"<button aria-label="Back" class="fixed top-6 left-6 z-50 w-10 h-10 rounded-full bg-quest-red/10 text-quest-maroon" hx-post="/api/quest/retreat" hx-target="{}" hx-swap="innerHTML">&larr;</button>"#,
            SCREEN_TARGET
        ));
    }

    let body = match screen {
        Screen::Welcome => render_welcome(),
        Screen::MoodBefore => render_mood(MoodCheck::Before, state.mood),
        Screen::Teaser => render_teaser(config),
        Screen::Section(key) => render_section_screen(key, state.section(key), None),
        Screen::MoodAfter => render_mood(MoodCheck::After, state.mood_after),
        Screen::Album => render_album(state),
    };
    html.push_str(&body);
    html
}

fn render_welcome() -> String {
    let mut html = String::with_capacity(1024);
    html.push_str(r#"<div class="min-h-screen flex flex-col items-center justify-center px-8 text-center">"#);
    html.push_str(&format!(r#"<p class="{} mb-12">February 14, 2026</p>"#, EYEBROW));
    html.push_str(
        r#"<h1 class="text-3xl leading-snug mb-6 font-normal font-serif text-quest-ink">Love is the art,<br>and you are my<br>masterpiece.</h1>"#,
    );
    html.push_str(&format!(
        r#"<button class="{} max-w-xs mt-10" hx-post="/api/quest/advance" hx-target="{}" hx-swap="innerHTML">Start Our Quest &rarr;</button>"#,
        BUTTON_PRIMARY, SCREEN_TARGET
    ));
    html.push_str("</div>");
    html
}

#[derive(Clone, Copy)]
enum MoodCheck {
    Before,
    After,
}

fn render_mood(check: MoodCheck, current: Option<u8>) -> String {
    let (eyebrow, title, route) = match check {
        MoodCheck::Before => ("Before we begin", "How excited<br>are you?", "/api/quest/mood"),
        MoodCheck::After => ("After our date", "How happy<br>are you now?", "/api/quest/mood-after"),
    };
    let value = current.unwrap_or(50);

    let mut html = String::with_capacity(2048);
    html.push_str(r#"<div class="min-h-screen flex flex-col items-center justify-center px-8">"#);
    html.push_str(&format!(r#"<p class="{}">{}</p>"#, EYEBROW, eyebrow));
    html.push_str(&format!(r#"<h2 class="{} text-center mb-10">{}</h2>"#, HEADING, title));

    // Alpine owns the slider; the server only sees the value on submit.
    html.push_str(&format!(
        r#"<form class="w-full max-w-xs flex flex-col items-center" x-data="{{ value: {} }}" hx-post="{}" hx-target="{}" hx-swap="innerHTML">"#,
        value, route, SCREEN_TARGET
    ));
    html.push_str(
        r#"<span class="text-5xl mb-2" x-text="value <= 20 ? '\u{1F610}' : value <= 40 ? '\u{1F642}' : value <= 60 ? '\u{1F60A}' : value <= 80 ? '\u{1F604}' : '\u{1F970}'"></span>"#,
    );
    html.push_str(&format!(
        r#"<span class="text-4xl font-light font-serif text-quest-red tabular-nums" x-text="value">{}</span>"#,
        value
    ));
    html.push_str(&format!(
        r#"<p class="text-sm text-quest-mute mb-10" x-text="value <= 20 ? 'Biasa aja' : value <= 40 ? 'Lumayan' : value <= 60 ? 'Seneng' : value <= 80 ? 'Happy banget!' : 'Loveee!'">{}</p>"#,
        steps::mood_label(value)
    ));
    html.push_str(&format!(
        r#"<input type="range" name="value" min="1" max="100" value="{}" x-model.number="value" class="w-full accent-quest-red">"#,
        value
    ));
    html.push_str(r#"<div class="flex justify-between w-full text-[10px] tracking-wider text-quest-mute mt-1"><span>1</span><span>100</span></div>"#);
    html.push_str(&format!(
        r#"<button type="submit" class="{} mt-6">Let's Go! &rarr;</button>"#,
        BUTTON_PRIMARY
    ));
    html.push_str("</form></div>");
    html
}

fn render_teaser(config: &QuestConfig) -> String {
    let clue_ms = config.timing.teaser_clue_ms;
    let clues_js: Vec<String> = steps::TEASER_CLUES
        .iter()
        .map(|c| format!("'{}'", escape_js_attr(c)))
        .collect();

    let mut html = String::with_capacity(1024);
    html.push_str(&format!(
        r#"<div class="min-h-screen flex flex-col items-center justify-center px-8 text-center" x-data="{{ clues: [{}], i: 0 }}" x-init="setInterval(() => {{ if (i < clues.length - 1) i++ }}, {})">"#,
        clues_js.join(", "),
        clue_ms
    ));
    html.push_str(&format!(
        r#"<p class="text-lg font-normal font-serif text-quest-ink" x-text="clues[i]">{}</p>"#,
        escape_html(steps::TEASER_CLUES[0])
    ));
    html.push_str(r#"<p class="text-xs mt-6 text-quest-mute opacity-50">Loading our adventure...</p>"#);
    // Self-advance once every clue has had its turn.
    html.push_str(&format!(
        r#"<div hx-post="/api/quest/advance" hx-trigger="load delay:{}ms" hx-target="{}" hx-swap="innerHTML"></div>"#,
        steps::teaser_dwell_ms(clue_ms),
        SCREEN_TARGET
    ));
    html.push_str("</div>");
    html
}

fn render_progress(key: SectionKey) -> String {
    let (current, total) = steps::progress(key);
    let mut html = String::with_capacity(512);
    html.push_str(r#"<div class="flex items-center justify-center gap-2 pt-8 pb-4">"#);
    for i in 1..=total {
        let class = if i <= current { "bg-quest-red" } else { "bg-quest-sand" };
        html.push_str(&format!(r#"<div class="h-0.5 w-8 {}"></div>"#, class));
    }
    html.push_str(&format!(
        r#"<span class="ml-2 text-[10px] tracking-[0.2em] text-quest-mute">{} / {}</span>"#,
        current, total
    ));
    html.push_str("</div>");
    html
}

/// A venue flow screen: progress bar plus the phase-derived body. A rejected
/// request passes its message as `error`; it is shown inside whichever phase
/// the stored flags imply.
pub fn render_section_screen(key: SectionKey, record: &SectionRecord, error: Option<&str>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str(r#"<div class="min-h-screen">"#);
    html.push_str(&render_progress(key));
    html.push_str(&format!(r#"<div id="{}">"#, &SECTION_TARGET[1..]));
    match (Phase::of(record), error) {
        (Phase::Documentation, _) => html.push_str(&render_documentation(key, record, error)),
        (Phase::Selection, Some(msg)) => {
            html.push_str(&format!(r#"<div class="px-8 pt-2 text-center">{}</div>"#, error_html(msg)));
            html.push_str(&render_section_body(key, record));
        }
        (Phase::Selection, None) => html.push_str(&render_section_body(key, record)),
    }
    html.push_str("</div></div>");
    html
}

/// Body of a venue flow for its current phase, derived from the stored flags.
pub fn render_section_body(key: SectionKey, record: &SectionRecord) -> String {
    match Phase::of(record) {
        Phase::Selection if key.info().is_secret() => render_secret_mystery(),
        Phase::Selection => render_selection(key, record),
        Phase::Documentation => render_documentation(key, record, None),
    }
}

fn render_selection(key: SectionKey, record: &SectionRecord) -> String {
    let info = key.info();
    let selected = record.place_name.as_str();

    let mut html = String::with_capacity(3072);
    html.push_str(r#"<div class="px-8 pb-12">"#);
    html.push_str(r#"<div class="text-center mb-10 mt-4">"#);
    html.push_str(&format!(r#"<p class="{}">Choose a place</p>"#, EYEBROW));
    html.push_str(&format!(r#"<h2 class="{}">{}</h2>"#, HEADING, info.title));
    html.push_str(&format!(r#"<p class="text-sm mt-2 text-quest-mute">{}</p>"#, info.subtitle));
    html.push_str("</div>");

    html.push_str(r#"<div class="space-y-3 mb-10">"#);
    for option in info.options {
        let is_selected = option.name == selected;
        let border = if is_selected {
            "border-quest-red bg-quest-blush text-quest-red"
        } else {
            "border-quest-sand text-quest-ink"
        };
        html.push_str(&format!(
            r#"<button class="w-full text-left px-5 py-4 border-[1.5px] rounded {}" hx-post="/api/quest/place" hx-vals='{{"section": "{}", "place": "{}"}}' hx-target="{}" hx-swap="innerHTML"><span class="text-xl mr-4">{}</span><span class="text-sm font-medium">{}</span></button>"#,
            border,
            key,
            escape_html(&option.name.replace('"', "\\\"")),
            SECTION_TARGET,
            option.emoji,
            escape_html(option.name),
        ));
    }
    html.push_str("</div>");

    html.push_str(&format!(
        r#"<button class="{} {}" hx-post="/api/quest/confirm" hx-vals='{{"section": "{}"}}' hx-target="{}" hx-swap="innerHTML"{}>Berangkat! &rarr;</button>"#,
        BUTTON_PRIMARY,
        BUTTON_DISABLED,
        key,
        SECTION_TARGET,
        if selected.is_empty() { " disabled" } else { "" }
    ));
    html.push_str("</div>");
    html
}

fn render_secret_mystery() -> String {
    let mut html = String::with_capacity(1024);
    html.push_str(r#"<div class="px-8 flex flex-col items-center justify-center min-h-[70vh]">"#);
    html.push_str(&format!(r#"<p class="{} mb-6">Something awaits</p>"#, EYEBROW));
    html.push_str(r#"<div class="w-full max-w-xs text-center mb-10 border-[1.5px] border-quest-sand rounded px-8 py-12">"#);
    html.push_str("<div class=\"text-5xl mb-6\">\u{1F92B}</div>");
    html.push_str(r#"<h2 class="text-xl font-normal font-serif text-quest-ink mb-3">Secret Activity</h2>"#);
    html.push_str(r#"<p class="text-sm leading-relaxed text-quest-mute">No spoilers.<br>Just trust the journey.</p>"#);
    html.push_str("</div>");
    html.push_str(&format!(
        r#"<button class="{} max-w-xs" hx-post="/api/quest/confirm" hx-vals='{{"section": "secret"}}' hx-target="{}" hx-swap="innerHTML">We're Here! &#10024;</button>"#,
        BUTTON_PRIMARY, SECTION_TARGET
    ));
    html.push_str("</div>");
    html
}

/// Transient acknowledgment after confirming arrival. Swaps itself for the
/// documentation form once the delay passes; nothing about it is stored.
pub fn render_feedback(key: SectionKey, config: &QuestConfig) -> String {
    format!(
        r#"<div class="flex flex-col items-center justify-center px-8 min-h-[60vh]"><p class="text-base text-center leading-relaxed font-serif text-quest-ink">{}</p><div hx-get="/api/quest/section?section={}" hx-trigger="load delay:{}ms" hx-target="{}" hx-swap="innerHTML"></div></div>"#,
        key.info().feedback,
        key,
        config.timing.feedback_ms,
        SECTION_TARGET
    )
}

/// Photo preview block, also returned by the upload export.
pub fn render_photo_preview(key: SectionKey, photo: Option<&str>) -> String {
    match photo {
        Some(src) => format!(
            r#"<div id="photo-{key}" class="relative overflow-hidden rounded" x-init="hasPhoto = true"><img src="{}" alt="Uploaded moment" class="w-full h-52 object-cover"><label for="photo-input-{key}" class="absolute bottom-3 right-3 px-3 py-1.5 text-[10px] tracking-wider uppercase font-medium bg-white/90 text-quest-ink rounded-sm cursor-pointer">Change</label></div>"#,
            escape_html(src)
        ),
        None => format!(
            r#"<label id="photo-{key}" for="photo-input-{key}" class="w-full h-44 flex flex-col items-center justify-center gap-3 border-[1.5px] border-dashed border-quest-sand rounded cursor-pointer"><p class="text-xs font-medium text-quest-mute">Tap to upload photo</p><p class="text-[10px] text-quest-mute opacity-70">JPG, PNG</p></label>"#
        ),
    }
}

/// Documentation form. Saving re-renders the whole screen because a
/// successful save advances the step.
pub fn render_documentation(key: SectionKey, record: &SectionRecord, error: Option<&str>) -> String {
    let info: &SectionInfo = key.info();
    let mut html = String::with_capacity(4096);

    html.push_str(&format!(
        r#"<div class="px-8 pb-12" x-data="{{ desc: '{}', hasPhoto: {} }}">"#,
        escape_js_attr(&record.description),
        record.has_photo()
    ));
    html.push_str(r#"<div class="text-center mb-8 mt-4">"#);
    html.push_str(&format!(r#"<p class="{}">Capture this moment</p>"#, EYEBROW));
    html.push_str(r#"<h2 class="text-xl font-normal font-serif text-quest-ink">Document the Memory</h2>"#);
    html.push_str("</div>");

    html.push_str(r#"<div class="flex flex-wrap gap-2 mb-6 justify-center">"#);
    html.push_str(&format!(
        r#"<span class="text-[10px] tracking-[0.15em] uppercase px-3 py-1.5 border border-quest-sand text-quest-mute rounded-sm">{}</span>"#,
        info.title
    ));
    html.push_str(&format!(
        r#"<span class="text-[10px] tracking-[0.15em] uppercase px-3 py-1.5 border border-quest-blush bg-quest-blush text-quest-red rounded-sm">{}</span>"#,
        escape_html(&record.place_name)
    ));
    html.push_str("</div>");

    // Upload goes through the `upload_photo` export, not an HTMX route.
    html.push_str(&format!(
        r#"<div class="mb-6"><input id="photo-input-{key}" type="file" accept="image/*" class="hidden" onchange="questPhoto.upload('{key}', this)">"#
    ));
    html.push_str(&render_photo_preview(key, record.photo.as_deref()));
    html.push_str("</div>");

    html.push_str(&format!(
        r#"<form hx-post="/api/quest/document" hx-target="{}" hx-swap="innerHTML"><input type="hidden" name="section" value="{}">"#,
        SCREEN_TARGET, key
    ));
    html.push_str(r#"<label class="block text-[10px] tracking-[0.2em] uppercase font-medium mb-2 text-quest-mute">Your story</label>"#);
    html.push_str(&format!(
        r#"<textarea name="description" rows="3" x-model="desc" placeholder="{}" class="w-full px-4 py-3 mb-8 text-sm resize-none border-[1.5px] border-quest-sand rounded bg-transparent text-quest-ink focus:border-quest-red">{}</textarea>"#,
        escape_html(info.prompt),
        escape_html(&record.description)
    ));
    if let Some(msg) = error {
        html.push_str(&format!(
            r#"<p class="text-quest-red text-sm mb-3">{}</p>"#,
            escape_html(msg)
        ));
    }
    html.push_str(&format!(
        r#"<button type="submit" class="{} {}" :disabled="!hasPhoto || !desc.trim()">Save &amp; Continue &rarr;</button>"#,
        BUTTON_PRIMARY, BUTTON_DISABLED
    ));
    html.push_str("</form></div>");
    html
}

fn render_album(state: &QuestState) -> String {
    let mut html = String::with_capacity(8192);
    html.push_str(r#"<div class="min-h-screen pb-16 bg-quest-cream">"#);
    html.push_str(&format!(r#"<div id="{}" class="bg-quest-cream">"#, ALBUM_CAPTURE_ID));

    html.push_str(r#"<div class="px-8 pt-10 pb-6 text-center">"#);
    html.push_str(r#"<p class="text-[10px] tracking-[0.3em] uppercase mb-3 text-quest-mute">Our Digital Photo Album</p>"#);
    html.push_str(r#"<h1 class="text-2xl font-normal mb-2 font-serif text-quest-ink">Valentine's Quest 2026</h1>"#);
    html.push_str("</div>");

    if let (Some(before), Some(after)) = (state.mood, state.mood_after) {
        html.push_str(r#"<div class="flex justify-center gap-6 mb-6">"#);
        for (label, value) in [("Before", before), ("After", after)] {
            html.push_str(&format!(
                r#"<div class="text-center"><p class="text-[9px] tracking-[0.2em] uppercase mb-1 text-quest-mute">{}</p><p class="text-lg font-light font-serif text-quest-red">{} {}</p></div>"#,
                label,
                steps::mood_emoji(value),
                value
            ));
        }
        html.push_str("</div>");
    }

    html.push_str(r#"<div class="px-6 pb-6"><div class="mx-auto max-w-[340px] bg-quest-maroon rounded-md px-3.5 py-4"><div class="bg-quest-cream rounded-sm p-2 space-y-2">"#);
    for key in SectionKey::ALL {
        html.push_str(&render_album_frame(key, state.section(key)));
    }
    html.push_str("</div></div></div>");
    html.push_str("</div>"); // close album-capture

    html.push_str(r#"<div class="px-8 mt-4 space-y-3">"#);
    html.push_str(&render_album_download());
    html.push_str(&format!(
        r#"<div id="{}"><button class="w-full py-3 text-sm font-medium text-quest-maroon border-[1.5px] border-quest-maroon rounded" hx-post="/api/quest/album/save" hx-target="{}" hx-swap="innerHTML">Keep in Our Album</button></div>"#,
        &ALBUM_STATUS_TARGET[1..],
        ALBUM_STATUS_TARGET
    ));
    html.push_str(&format!(
        r#"<button class="w-full py-3 text-xs tracking-[0.15em] uppercase text-quest-mute" hx-post="/api/quest/reset" hx-target="{}" hx-swap="innerHTML">Start New Quest</button>"#,
        SCREEN_TARGET
    ));
    html.push_str("</div></div>");
    html
}

/// PNG export of `#album-capture`. Rasterizing is the host's job
/// (`questAlbum.download` resolves once the file is handed to the browser);
/// Alpine tracks the busy and done states.
fn render_album_download() -> String {
    format!(
        r#"<div x-data="{{ busy: false, done: false }}"><button x-show="!done" class="{} bg-quest-maroon" :disabled="busy" @click="busy = true; questAlbum.download('#{}', '{}').then(() => done = true).catch(() => alert('{}')).finally(() => busy = false)" x-text="busy ? 'Downloading...' : 'Save Album Forever \u{{2661}}'">Save Album Forever &#9825;</button><div x-show="done" x-cloak class="w-full py-3.5 text-center text-sm font-medium text-quest-maroon border-[1.5px] border-quest-maroon rounded">&#10003; Album Downloaded!</div></div>"#,
        BUTTON_PRIMARY,
        ALBUM_CAPTURE_ID,
        ALBUM_DOWNLOAD_NAME,
        escape_js_attr(ALBUM_DOWNLOAD_FAILED)
    )
}

fn render_album_frame(key: SectionKey, record: &SectionRecord) -> String {
    let info = key.info();
    let mut html = String::with_capacity(1024);
    html.push_str(r#"<div class="overflow-hidden border-4 border-quest-maroon rounded-sm bg-white">"#);
    match record.photo.as_deref().filter(|p| !p.is_empty()) {
        Some(src) => html.push_str(&format!(
            r#"<div class="h-[140px]"><img src="{}" alt="{}" class="w-full h-full object-cover"></div>"#,
            escape_html(src),
            escape_html(&record.place_name)
        )),
        None => html.push_str(&format!(
            r#"<div class="h-[140px] bg-quest-cream flex flex-col items-center justify-center gap-2"><span class="text-3xl">{}</span><p class="text-[10px] tracking-wider uppercase text-quest-mute">{}</p></div>"#,
            info.placeholder_emoji, info.label
        )),
    }
    html.push_str(r#"<div class="px-3 py-2 bg-white">"#);
    html.push_str(&format!(
        r#"<p class="text-[9px] tracking-[0.15em] uppercase font-medium mb-0.5 text-quest-maroon">Our {} at {}</p>"#,
        info.label,
        escape_html(&record.place_name)
    ));
    if !record.description.is_empty() {
        html.push_str(&format!(
            r#"<p class="text-[11px] leading-relaxed text-quest-mute font-serif italic">&ldquo;{}&rdquo;</p>"#,
            escape_html(&record.description)
        ));
    }
    html.push_str("</div></div>");
    html
}
