//! Prompt construction for each retro media format.
//!
//! A table maps every [`MediaType`] to a render function plus a small set of
//! scene phrases; one scene is drawn through the caller's RNG so otherwise
//! identical requests vary a little. Unknown media types degrade to a
//! generic template. The builder is total: it never fails and never returns
//! an empty string.

use crate::models::MediaType;
use rand::seq::SliceRandom;
use rand::Rng;

/// Fixed realism boilerplate appended to every prompt.
const REALISM: &str =
    "Shot on film, natural lighting, realistic textures. NOT a digital render.";

/// Inputs to [`build_prompt`]. The phrase is required; everything else is
/// optional and omitted clauses disappear entirely rather than interpolating
/// empty strings.
#[derive(Debug, Clone, Default)]
pub struct PromptInput {
    pub phrase: String,
    pub subtitle: Option<String>,
    pub media_type: Option<String>,
    pub vibe: Option<String>,
    pub movie_genre: Option<String>,
    pub flyer_style: Option<String>,
    pub decade: Option<String>,
    pub found_at: Option<String>,
}

struct Template {
    media: MediaType,
    scenes: &'static [&'static str],
    render: fn(&PromptInput, &str) -> String,
}

/// Adding a media type means adding one entry here.
const TEMPLATES: &[Template] = &[
    Template {
        media: MediaType::Book,
        scenes: &[
            "lying on a cluttered wooden desk in an academic study",
            "in a thrift store bin",
            "on an estate-sale table",
        ],
        render: render_book,
    },
    Template {
        media: MediaType::VinylRecord,
        scenes: &[
            "lying on carpet in a living room, a turntable visible at the edge of frame",
            "in a crate at a record fair",
            "propped against a milk crate of other records",
        ],
        render: render_vinyl,
    },
    Template {
        media: MediaType::VhsTape,
        scenes: &[
            "sitting among other tapes on a messy coffee table, a remote control nearby",
            "in a cardboard box at a yard sale",
            "on the shelf of a defunct rental store",
        ],
        render: render_vhs,
    },
    Template {
        media: MediaType::GigFlyer,
        scenes: &[
            "stapled to a weathered telephone pole, dark street behind",
            "taped inside a dive-bar window",
            "pinned to a crowded venue corkboard",
        ],
        render: render_gig_flyer,
    },
    Template {
        media: MediaType::Cassette,
        scenes: &[
            "on a car dashboard, the interior visible in the background",
            "in a shoebox of old mixtapes",
            "on a bedroom windowsill, sun-bleached",
        ],
        render: render_cassette,
    },
];

/// Build the image-generation prompt for a request.
///
/// The scene phrase comes from the request's `found_at` when present,
/// otherwise it is drawn at random from the media type's fixed set. Passing
/// a seeded RNG makes the output fully deterministic.
pub fn build_prompt<R: Rng + ?Sized>(input: &PromptInput, rng: &mut R) -> String {
    let template = input
        .media_type
        .as_deref()
        .and_then(MediaType::parse)
        .and_then(|media| TEMPLATES.iter().find(|t| t.media == media));

    match template {
        Some(template) => {
            let scene = match trimmed(&input.found_at) {
                Some(found_at) => found_at.to_string(),
                None => template
                    .scenes
                    .choose(rng)
                    .copied()
                    .unwrap_or("on a dusty shelf")
                    .to_string(),
            };
            (template.render)(input, &scene)
        }
        None => render_generic(input),
    }
}

/// Replace comma conjunctions with "and" so vibes read as prose.
pub fn normalize_vibe(vibe: &str) -> String {
    vibe.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" and ")
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn style_clause(label: &str, input: &PromptInput) -> String {
    let vibe = normalize_vibe(input.vibe.as_deref().unwrap_or_default());
    let mut clause = format!("DESIGN STYLE: The {} aesthetic is {}.", label, vibe);
    if let Some(decade) = trimmed(&input.decade) {
        clause.push_str(&format!(" The design is unmistakably {}.", decade));
    }
    clause
}

fn render_book(input: &PromptInput, scene: &str) -> String {
    let subtitle = trimmed(&input.subtitle)
        .map(|subtitle| format!(" The subtitle \"{}\" appears below the title.", subtitle))
        .unwrap_or_default();
    format!(
        "A photograph of a hardcover book {scene}.\n\
         TEXT ON COVER: The title \"{phrase}\" is printed prominently on the dust jacket.{subtitle}\n\
         The book has worn edges, a coffee ring stain nearby, reading glasses and papers visible.\n\
         {style}\n\
         {realism}",
        scene = scene,
        phrase = input.phrase,
        subtitle = subtitle,
        style = style_clause("cover design", input),
        realism = REALISM,
    )
}

fn render_vinyl(input: &PromptInput, scene: &str) -> String {
    format!(
        "An overhead photograph of a vinyl record sleeve {scene}.\n\
         TEXT ON COVER: The album title \"{phrase}\" appears on the sleeve.\n\
         The sleeve has ring wear, soft corners, and a price sticker.\n\
         {style}\n\
         {realism}",
        scene = scene,
        phrase = input.phrase,
        style = style_clause("cover art", input),
        realism = REALISM,
    )
}

fn render_vhs(input: &PromptInput, scene: &str) -> String {
    let genre = trimmed(&input.movie_genre)
        .map(|genre| format!("The faded box art suggests a {} film. ", genre))
        .unwrap_or_default();
    format!(
        "A photograph of a VHS tape {scene}.\n\
         TEXT ON LABEL: A handwritten label reads \"{phrase}\" in black marker on the spine.\n\
         {genre}The plastic is scratched and dusty, harsh overhead lighting.\n\
         {style}\n\
         {realism}",
        scene = scene,
        phrase = input.phrase,
        genre = genre,
        style = style_clause("overall", input),
        realism = REALISM,
    )
}

fn render_gig_flyer(input: &PromptInput, scene: &str) -> String {
    let layout = trimmed(&input.flyer_style)
        .map(|style| format!(" The layout is {}.", style))
        .unwrap_or_default();
    format!(
        "A nighttime flash photograph of a gig flyer {scene}.\n\
         TEXT ON FLYER: \"{phrase}\" appears in bold lettering as the headline.\n\
         The paper is torn at the edges, layered over older flyers, held by rusty staples.\n\
         {style}{layout}\n\
         {realism}",
        scene = scene,
        phrase = input.phrase,
        style = style_clause("flyer design", input),
        layout = layout,
        realism = REALISM,
    )
}

fn render_cassette(input: &PromptInput, scene: &str) -> String {
    format!(
        "A flash photograph of a cassette tape case {scene}.\n\
         TEXT ON J-CARD: The album title \"{phrase}\" is printed on the J-card insert.\n\
         The plastic case is cracked and sun-faded.\n\
         {style}\n\
         {realism}",
        scene = scene,
        phrase = input.phrase,
        style = style_clause("J-card design", input),
        realism = REALISM,
    )
}

fn render_generic(input: &PromptInput) -> String {
    format!(
        "A photograph of a vintage object with the text \"{}\" clearly visible. Style: {}. {}",
        input.phrase,
        normalize_vibe(input.vibe.as_deref().unwrap_or_default()),
        REALISM,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::mock::StepRng;

    const ALL_MEDIA_LABELS: &[&str] = &[
        "Book",
        "Vinyl Record",
        "VHS Tape",
        "Gig Flyer",
        "Cassette",
    ];

    fn input_for(media_type: &str) -> PromptInput {
        PromptInput {
            phrase: "Panic at the Disco Brunch".to_string(),
            media_type: Some(media_type.to_string()),
            vibe: Some("1980s Neon Horror".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_every_media_type_embeds_phrase_verbatim() {
        for label in ALL_MEDIA_LABELS {
            let prompt = build_prompt(&input_for(label), &mut StepRng::new(0, 1));
            assert!(!prompt.is_empty(), "{} produced an empty prompt", label);
            assert!(
                prompt.contains("Panic at the Disco Brunch"),
                "{} prompt missing the phrase: {}",
                label,
                prompt
            );
            assert!(prompt.contains(REALISM));
        }
    }

    #[test]
    fn test_book_subtitle_only_when_present() {
        let mut input = input_for("Book");
        input.subtitle = Some("The Dylan Story".to_string());
        let prompt = build_prompt(&input, &mut StepRng::new(0, 1));
        assert!(prompt.contains("The subtitle \"The Dylan Story\" appears below the title."));

        input.subtitle = None;
        let prompt = build_prompt(&input, &mut StepRng::new(0, 1));
        assert!(!prompt.contains("subtitle"));

        // Blank subtitles are treated as absent, not interpolated empty.
        input.subtitle = Some("   ".to_string());
        let prompt = build_prompt(&input, &mut StepRng::new(0, 1));
        assert!(!prompt.contains("subtitle"));
    }

    #[test]
    fn test_subtitle_ignored_for_non_book_media() {
        let mut input = input_for("Vinyl Record");
        input.subtitle = Some("Never Shown".to_string());
        let prompt = build_prompt(&input, &mut StepRng::new(0, 1));
        assert!(!prompt.contains("Never Shown"));
    }

    #[test]
    fn test_unknown_media_type_uses_generic_template() {
        let prompt = build_prompt(&input_for("Laserdisc"), &mut StepRng::new(0, 1));
        assert!(prompt.contains("vintage object"));
        assert!(prompt.contains("Panic at the Disco Brunch"));

        let missing = PromptInput {
            phrase: "Lost Media".to_string(),
            ..Default::default()
        };
        let prompt = build_prompt(&missing, &mut StepRng::new(0, 1));
        assert!(prompt.contains("vintage object"));
        assert!(prompt.contains("Lost Media"));
    }

    #[test]
    fn test_deterministic_with_seeded_rng() {
        let input = input_for("Vinyl Record");
        let first = build_prompt(&input, &mut StepRng::new(0, 1));
        let second = build_prompt(&input, &mut StepRng::new(0, 1));
        assert_eq!(first, second);
    }

    #[test]
    fn test_scene_comes_from_media_type_set() {
        let prompt = build_prompt(&input_for("Cassette"), &mut StepRng::new(0, 1));
        let from_set = TEMPLATES
            .iter()
            .find(|t| t.media == MediaType::Cassette)
            .unwrap()
            .scenes
            .iter()
            .any(|scene| prompt.contains(scene));
        assert!(from_set, "no cassette scene phrase in: {}", prompt);
    }

    #[test]
    fn test_found_at_overrides_random_scene() {
        let mut input = input_for("VHS Tape");
        input.found_at = Some("under the seat of an abandoned van".to_string());
        let prompt = build_prompt(&input, &mut StepRng::new(0, 1));
        assert!(prompt.contains("under the seat of an abandoned van"));
    }

    #[test]
    fn test_vibe_commas_become_and() {
        assert_eq!(
            normalize_vibe("grainy, neon, overexposed"),
            "grainy and neon and overexposed"
        );
        assert_eq!(normalize_vibe("plain"), "plain");
        assert_eq!(normalize_vibe(""), "");
        assert_eq!(normalize_vibe(" a , , b "), "a and b");

        let mut input = input_for("Gig Flyer");
        input.vibe = Some("xerox grit, riot grrrl".to_string());
        let prompt = build_prompt(&input, &mut StepRng::new(0, 1));
        assert!(prompt.contains("xerox grit and riot grrrl"));
    }

    #[test]
    fn test_decade_appends_style_clause() {
        let mut input = input_for("Vinyl Record");
        input.decade = Some("1970s".to_string());
        let prompt = build_prompt(&input, &mut StepRng::new(0, 1));
        assert!(prompt.contains("The design is unmistakably 1970s."));
    }

    #[test]
    fn test_vhs_movie_genre_clause() {
        let mut input = input_for("VHS Tape");
        input.movie_genre = Some("slasher".to_string());
        let prompt = build_prompt(&input, &mut StepRng::new(0, 1));
        assert!(prompt.contains("The faded box art suggests a slasher film."));

        input.movie_genre = None;
        let prompt = build_prompt(&input, &mut StepRng::new(0, 1));
        assert!(!prompt.contains("box art"));
    }
}
