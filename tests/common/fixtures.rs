//! Synthetic Kol-Hay site served from a wiremock server
//!
//! Pages carry just enough markup for the site selectors to match: a catalog
//! drop-down, search results, breadcrumb trails, pagination, listing articles
//! and detail pages with audio players.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One broadcast detail page
#[derive(Clone, Debug)]
pub struct FakeDetail {
    /// Numeric id used in the page and audio URLs
    pub id: u32,
    /// Page title
    pub title: String,
    /// Number of audio players on the page
    pub tracks: usize,
}

impl FakeDetail {
    pub fn new(id: u32, title: &str, tracks: usize) -> Self {
        Self {
            id,
            title: title.to_string(),
            tracks,
        }
    }

    /// Site path of the detail page
    pub fn path(&self) -> String {
        format!("/radio/broadcast/{}/", self.id)
    }

    /// Site path of track `n` (1-based)
    pub fn audio_path(&self, n: usize) -> String {
        format!("/audio/{}-{}.mp3", self.id, n)
    }
}

/// A program and its listing pages
#[derive(Clone, Debug)]
pub struct FakeProgram {
    pub name: String,
    pub slug: String,
    /// Detail pages per listing page, in page order
    pub pages: Vec<Vec<FakeDetail>>,
}

impl FakeProgram {
    pub fn new(name: &str, slug: &str, pages: Vec<Vec<FakeDetail>>) -> Self {
        Self {
            name: name.to_string(),
            slug: slug.to_string(),
            pages,
        }
    }

    pub fn details(&self) -> impl Iterator<Item = &FakeDetail> {
        self.pages.iter().flatten()
    }
}

/// Body served for an audio track
pub fn audio_body(id: u32, track: usize) -> Vec<u8> {
    format!("ID3 fake audio {}-{}", id, track).into_bytes()
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(format!("<!DOCTYPE html><html><body>{}</body></html>", body))
}

fn catalog_page(programs: &[FakeProgram]) -> String {
    let options: String = programs
        .iter()
        .map(|p| format!("<option value=\"{}\">{}</option>", p.slug, p.name))
        .collect();
    format!(
        r#"<form><select class="program-name" name="program-name"><option value="">All programs</option>{}</select></form>"#,
        options
    )
}

fn breadcrumbs(program: &FakeProgram) -> String {
    format!(
        r#"<p id="breadcrumbs"><span><span><a href="/">Home</a></span> » <span><a href="/radio/">Radio</a></span> » <span><a href="/radio/program/{}/">{}</a></span></span></p>"#,
        program.slug, program.name
    )
}

fn pagination(program: &FakeProgram) -> String {
    if program.pages.len() <= 1 {
        return String::new();
    }
    let items: String = (2..=program.pages.len())
        .map(|n| {
            format!(
                r#"<li><a href="/radio/program/{}/page/{}/">{}</a></li>"#,
                program.slug, n, n
            )
        })
        .collect();
    format!(r#"<ul class="pagination"><li><span>1</span></li>{}</ul>"#, items)
}

fn listing_page(details: &[FakeDetail]) -> String {
    let items: String = details
        .iter()
        .map(|d| {
            format!(
                r#"<li><article><h1><a href="{}">{}</a></h1><p>summary</p></article></li>"#,
                d.path(),
                d.title
            )
        })
        .collect();
    format!(r#"<section class="latest-broadcasts"><ul>{}</ul></section>"#, items)
}

fn detail_page(program: &FakeProgram, detail: &FakeDetail) -> String {
    let players: String = (1..=detail.tracks)
        .map(|n| {
            format!(
                r#"<div class="player-position"><audio controls><source src="{p}"><a href="{p}">Download</a></audio></div>"#,
                p = detail.audio_path(n)
            )
        })
        .collect();
    format!(
        r#"{}<main class="main program"><h1>{}</h1><div class="content">{}</div></main>"#,
        breadcrumbs(program),
        detail.title,
        players
    )
}

/// Mount every page of `programs` on `server`
///
/// Search mocks are mounted before the catalog so a query for a known program
/// never falls through to the catalog page; unknown names get the catalog,
/// which has no search results.
pub async fn mount_site(server: &MockServer, programs: &[FakeProgram]) {
    for program in programs {
        let hit = program
            .details()
            .next()
            .map(|d| format!(r#"<li><a href="{}">{}</a></li>"#, d.path(), d.title))
            .unwrap_or_default();
        Mock::given(method("GET"))
            .and(path("/radio/broadcast/"))
            .and(query_param("program-name", program.name.as_str()))
            .respond_with(html(&format!(r#"<div class="list"><ul>{}</ul></div>"#, hit)))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/radio/program/{}/", program.slug)))
            .respond_with(html(&format!(
                "{}{}{}",
                breadcrumbs(program),
                listing_page(program.pages.first().map(Vec::as_slice).unwrap_or_default()),
                pagination(program)
            )))
            .mount(server)
            .await;

        for (i, details) in program.pages.iter().enumerate() {
            Mock::given(method("GET"))
                .and(path(format!("/radio/program/{}/page/{}", program.slug, i + 1)))
                .respond_with(html(&format!("{}{}", listing_page(details), pagination(program))))
                .mount(server)
                .await;
        }

        for detail in program.details() {
            Mock::given(method("GET"))
                .and(path(detail.path()))
                .respond_with(html(&detail_page(program, detail)))
                .mount(server)
                .await;

            for n in 1..=detail.tracks {
                Mock::given(method("GET"))
                    .and(path(detail.audio_path(n)))
                    .respond_with(
                        ResponseTemplate::new(200)
                            .insert_header("content-type", "audio/mpeg")
                            .set_body_bytes(audio_body(detail.id, n)),
                    )
                    .mount(server)
                    .await;
            }
        }
    }

    Mock::given(method("GET"))
        .and(path("/radio/broadcast/"))
        .respond_with(html(&catalog_page(programs)))
        .mount(server)
        .await;
}

/// Two programs: a three-page one with mixed track counts and a single-page one
pub fn sample_programs() -> Vec<FakeProgram> {
    vec![
        FakeProgram::new(
            "Morning Show",
            "morning-show",
            vec![
                vec![
                    FakeDetail::new(101, "Morning 01/03", 1),
                    FakeDetail::new(102, "Morning 02/03", 2),
                ],
                vec![FakeDetail::new(103, "Morning 03/03", 1)],
                vec![
                    FakeDetail::new(104, "Morning 04/03", 0),
                    FakeDetail::new(105, "Morning 05/03", 3),
                ],
            ],
        ),
        FakeProgram::new(
            "Night Talk",
            "night-talk",
            vec![vec![FakeDetail::new(201, "Night: Special?", 1)]],
        ),
    ]
}
