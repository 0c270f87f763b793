// Built-in tambura figures.
//
// The first group are traditional patterns from John Pitts' tambura
// method; the rest grew out of droning sessions and are named for the
// moods they set. All offsets are semitones from the tonic, so any figure
// can be droned from any root.
//
// Bracketed entries in a figure (here: `ch`/`ch_gr`) are optional notes —
// whether they play on a given pass is decided by the selection policy.

use crate::pattern::{Alternative, Pattern, Step};

fn n(offset: i8) -> Step {
    Step::Fixed(offset)
}

fn gr(first: i8, second: i8) -> Step {
    Step::Grace { first, second }
}

fn ch(offsets: &[i8]) -> Step {
    Step::Choice(offsets.iter().map(|&o| Alternative::Note(o)).collect())
}

fn ch_gr(first: i8, second: i8) -> Step {
    Step::Choice(vec![Alternative::Grace { first, second }])
}

/// The names of all built-in figures, in catalog order.
pub fn names() -> &'static [&'static str] {
    &[
        "classical",
        "alternate",
        "latangi",
        "todi",
        "vachaspati",
        "patdeep",
        "desh",
        "malhar",
        "chayanat",
        "bliss",
        "mountain_stream",
        "little_girl",
        "landscape",
        "wise_man",
        "gezelle",
        "moonlight",
        "waiting_bride",
        "sleep",
        "pollen_breeze",
        "elegant_mischief",
        "saffron_aroma",
        "ruddy_goose",
        "intense_coffee",
        "morning_sun",
        "mourning",
        "full_of_hope",
        "lady_lost_in_forest",
        "lunchtime_bell",
        "flowing_honey",
        "stealing_my_heart",
        "beautiful_hair",
        "from_the_east",
        "satisfaction",
        "pollen_breeze_lower",
        "pollen_breeze_upper",
    ]
}

/// Look up a built-in figure by name.
pub fn by_name(name: &str) -> Option<Pattern> {
    let steps = match name {
        // Works under just about anything.
        "classical" => vec![n(-5), n(0), n(0), n(-12)],
        // Suits asian scales and sus-tonic pieces.
        "alternate" => vec![n(-7), n(0), n(0), n(-12)],
        // Major 7, 9.
        "latangi" => vec![
            n(-5),
            n(-1),
            n(0),
            n(0),
            n(-12),
            n(-5),
            n(2),
            n(0),
            n(-12),
        ],
        // Blues complement.
        "todi" => vec![n(-4), n(1), n(0), n(-12)],
        // Mixolydian.
        "vachaspati" => vec![n(-5), n(-2), n(0), n(-12)],
        // Minor.
        "patdeep" => vec![n(-5), n(-1), n(0), n(-12), n(3)],
        // Sharp 6.
        "desh" => vec![
            n(-5),
            n(-1),
            n(0),
            n(-12),
            n(-5),
            n(0),
            n(2),
            n(0),
            n(-12),
        ],
        // 9.
        "malhar" => vec![
            n(-5),
            n(0),
            n(0),
            n(-12),
            n(-5),
            n(2),
            n(0),
            n(0),
            n(-12),
        ],
        // Tritone.
        "chayanat" => vec![n(-5), n(2), n(-12), n(-5), n(4), n(2), n(-12)],
        "bliss" => vec![
            n(0),
            n(7),
            n(9),
            n(7),
            n(9),
            ch(&[0, 2, 4, 5]),
            gr(-12, -7),
            ch(&[-10, -19, -24]),
        ],
        // Minor.
        "mountain_stream" => vec![n(-5), n(0), n(0), n(2), n(0), n(-2), n(0), n(-12)],
        "little_girl" => vec![
            n(-5),
            n(0),
            n(0),
            n(-12),
            n(-1),
            n(0),
            ch(&[-5]),
            ch(&[4]),
            ch(&[2]),
            ch(&[-1]),
        ],
        "landscape" => vec![
            n(7),
            n(11),
            n(12),
            n(12),
            n(14),
            ch(&[7]),
            ch(&[9]),
            ch(&[11]),
            gr(-5, 0),
            ch(&[-5]),
            ch(&[-12]),
            ch(&[-17]),
        ],
        // Major.
        "wise_man" => vec![
            n(-5),
            n(-2),
            n(0),
            n(0),
            ch(&[2]),
            ch(&[4]),
            ch(&[-10]),
            n(-12),
        ],
        "gezelle" => vec![
            n(-5),
            ch(&[-4]),
            n(0),
            n(0),
            ch(&[1]),
            ch(&[4]),
            ch(&[-1]),
            n(-12),
        ],
        "moonlight" => vec![
            n(7),
            n(12),
            n(14),
            n(10),
            n(12),
            ch(&[8, 10, -2]),
            n(0),
        ],
        "waiting_bride" => vec![n(-5), n(0), n(0), n(2), ch(&[2, 3, 5]), n(-12)],
        "sleep" => vec![
            n(-7),
            n(-5),
            n(-2),
            n(0),
            n(-12),
            n(-7),
            n(-5),
            n(0),
            n(2),
            n(-2),
            n(0),
            n(-12),
        ],
        "pollen_breeze" => vec![
            n(7),
            n(8),
            ch(&[11]),
            n(8),
            ch(&[6]),
            n(0),
            ch(&[1]),
        ],
        "elegant_mischief" => vec![ch(&[-7]), n(-8), n(-7), gr(1, 0), n(0), n(-12)],
        "saffron_aroma" => vec![n(-5), ch(&[0]), ch(&[0, 1]), n(0), n(-12)],
        "ruddy_goose" => vec![n(-5), n(0), n(0), n(-12), n(4), gr(1, 0), n(-12)],
        "intense_coffee" => vec![n(-5), ch(&[-1]), n(0), n(0), n(-12)],
        "morning_sun" => vec![
            n(-5),
            n(4),
            ch(&[1]),
            gr(-2, 0),
            ch(&[0]),
            gr(-2, 0),
            ch(&[-11]),
            ch(&[-14]),
            n(-12),
            n(-8),
        ],
        "mourning" => vec![
            n(-5),
            ch(&[-2]),
            n(0),
            n(0),
            n(-11),
            n(-12),
            n(-5),
            n(1),
            n(0),
            n(-12),
        ],
        "full_of_hope" => vec![
            n(-12),
            n(-5),
            gr(0, 2),
            gr(2, 3),
            ch_gr(-4, -2),
            ch(&[-14]),
            ch_gr(-2, 0),
        ],
        "lady_lost_in_forest" => vec![n(-16), ch_gr(-17, -16), n(-11), n(-12), n(-24)],
        "lunchtime_bell" => vec![n(-17), n(-12), n(-12), n(-24)],
        "flowing_honey" => vec![
            n(-5),
            ch(&[-3, -1, 0]),
            n(0),
            n(2),
            ch(&[6, 7, 9, 11, 12]),
            n(-12),
            ch(&[-10]),
            n(-5),
            ch(&[-3, -1, 0]),
            n(0),
            n(2),
            ch(&[6, 7, 9, 11, 12]),
            n(-12),
            n(0),
            n(-5),
            ch(&[-3, -1, 0]),
            n(-12),
            ch(&[6, 7, 9, 11, 12, -10]),
            n(2),
            n(-5),
            ch(&[-3, -1, 0]),
            n(0),
            n(2),
            ch(&[6, 7, 9, 11, 12]),
            n(-12),
            ch(&[-10]),
            n(-5),
            ch(&[-3, -1, 0]),
            n(0),
            n(-12),
            ch(&[6, 7, 9, 11, 12]),
            n(2),
            n(0),
            n(-5),
            ch(&[-3, -1, 0]),
            n(2),
            ch(&[6, 7, 9, 11, 12, -10]),
            n(-12),
        ],
        "stealing_my_heart" => vec![
            ch(&[-24]),
            ch(&[-17]),
            n(-12),
            n(7),
            n(2),
            ch(&[-24]),
            n(8),
            n(0),
            n(10),
            n(6),
            n(12),
        ],
        "beautiful_hair" => vec![
            n(-5),
            n(-4),
            n(0),
            n(2),
            n(0),
            n(2),
            n(2),
            n(4),
            n(2),
            n(4),
            gr(-17, -12),
            ch(&[-17, -24, -29]),
        ],
        "from_the_east" => vec![n(-5), n(0), n(-12), n(-4), ch(&[1, 4])],
        "satisfaction" => vec![
            n(-15),
            n(-11),
            n(-12),
            n(-24),
            n(-13),
            n(-12),
            n(-12),
            n(-24),
        ],
        // The two pollen_breeze_* parts form an opening swell: render each
        // with repeats = 1, the same tonic, tempo, and seed, then follow
        // with the pollen_breeze drone while the melody develops. The
        // upper part rests while the lower part establishes the figure.
        "pollen_breeze_lower" => vec![
            n(7),
            n(8),
            n(8),
            n(0),
            n(7),
            n(8),
            n(8),
            n(0),
            n(7),
            n(8),
            n(8),
            n(0),
            n(7),
            n(8),
            n(8),
            n(0),
            n(7),
            n(8),
            n(8),
            n(11),
            n(0),
            n(7),
            n(8),
            n(8),
            n(11),
            n(1),
            n(0),
            n(7),
            n(8),
            n(8),
            n(11),
            n(1),
            n(8),
            n(0),
            n(7),
            n(8),
            n(8),
            n(11),
            n(1),
            n(8),
            n(0),
            n(5),
            n(7),
            n(8),
            n(8),
            n(11),
            n(1),
            n(8),
            n(0),
            n(5),
        ],
        "pollen_breeze_upper" => vec![
            Step::Rest,
            Step::Rest,
            Step::Rest,
            Step::Rest,
            Step::Rest,
            Step::Rest,
            Step::Rest,
            Step::Rest,
            n(20),
            n(13),
            n(12),
            n(20),
            n(13),
            n(12),
            n(20),
            n(13),
            n(12),
            n(20),
            n(19),
            n(13),
            n(12),
            n(20),
            n(19),
            n(13),
            n(12),
            n(20),
            n(19),
            n(13),
            n(11),
            n(12),
            n(20),
            n(19),
            n(13),
            n(11),
            n(12),
            n(20),
            n(19),
            n(13),
            n(11),
            n(12),
            n(16),
            n(20),
            n(19),
            n(13),
            n(11),
            n(12),
            n(15),
            n(20),
            n(13),
            n(12),
        ],
        _ => return None,
    };
    Some(Pattern::new(steps))
}
