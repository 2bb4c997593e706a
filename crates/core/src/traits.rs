//! Trait generation: turns a seed into the full set of design decisions.
//!
//! Generation is one long sequential script of PRNG draws. The script is
//! modeled as [`DrawStep::ORDER`], a fixed list of named steps applied by a
//! builder. The number and order of draws in every step is part of the
//! output contract: reordering, merging or skipping a draw changes every
//! downstream value for a given seed.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ArtError;
use crate::palette::{Ink, InkPalette};
use crate::prng::SeededRandom;
use crate::seed::TokenData;

/// Upper bound on draws spent looking for a second ink distinct from the first.
pub const MAX_INK_DRAWS: usize = 10_000;

/// Background choices, drawn with `choice` in this order.
const BACKGROUND_TYPES: [BackgroundType; 2] = [BackgroundType::Solid, BackgroundType::Gradient];

/// Overlay opacities; 0.5 appears twice so it is drawn twice as often.
const OVERLAY_OPACITIES: [f64; 3] = [0.2, 0.5, 0.5];

/// Number of 45 degree steps a semicircle may be rotated by.
const SEMICIRCLE_ROTATIONS: usize = 8;

/// Fill style of one color layer's background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundType {
    Solid,
    Gradient,
}

/// Background of one color layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundSpec {
    #[serde(rename = "type")]
    pub kind: BackgroundType,
    pub dark: bool,
}

/// Backgrounds of both layers plus the flip shared by their gradients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backgrounds {
    pub first_colour: BackgroundSpec,
    pub second_colour: BackgroundSpec,
    pub flipped: bool,
}

/// Decorative element placed on the grid overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
    Cross,
    Plus,
    Semicircle,
}

impl ShapeKind {
    /// Every kind, in the order kind draws index into.
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Circle,
        ShapeKind::Cross,
        ShapeKind::Plus,
        ShapeKind::Semicircle,
    ];
}

/// One shape on the normalized unit grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridShape {
    /// Column / max_dot_x, in [0, 1).
    pub x: f64,
    /// Row / max_dot_y, in [0, 1).
    pub y: f64,
    pub kind: ShapeKind,
    pub filled: bool,
    /// Half a column width: `1 / (2 * max_dot_x)`.
    pub size: f64,
    pub rotation_degrees: u32,
}

/// Positional offset of a layer's grid overlay, each axis in [-0.5, 0.5).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nudge {
    pub x: f64,
    pub y: f64,
}

/// Intermediate decisions that shaped the grid, kept for inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridDecisions {
    pub all_one_thing: bool,
    pub solid_chance: f64,
    pub all_solid: bool,
    pub all_hollow: bool,
    pub show_all: bool,
    pub shape_kinds: Vec<ShapeKind>,
    pub max_dot_x: usize,
    pub max_dot_y: usize,
}

/// Which of the two ink layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InkLayer {
    First,
    Second,
}

/// Everything a single layer render needs from the traits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerParams {
    pub background: BackgroundSpec,
    pub flipped: bool,
    pub shape_opacity: f64,
    pub nudge: Nudge,
}

/// The full, immutable set of design decisions for one seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    pub token: TokenData,
    pub first_colour: Ink,
    pub second_colour: Ink,
    pub background: Backgrounds,
    /// Shapes in row-major scan order, which is also draw order.
    pub grid: Vec<GridShape>,
    pub grid_first_colour_opacity: f64,
    pub grid_second_colour_opacity: f64,
    pub grid_first_nudge: Nudge,
    pub grid_second_nudge: Nudge,
    pub decisions: GridDecisions,
}

impl Traits {
    /// The ink assigned to a layer.
    pub fn ink(&self, layer: InkLayer) -> &Ink {
        match layer {
            InkLayer::First => &self.first_colour,
            InkLayer::Second => &self.second_colour,
        }
    }

    /// Background, overlay opacity and nudge for a layer.
    pub fn layer_params(&self, layer: InkLayer) -> LayerParams {
        let (background, shape_opacity, nudge) = match layer {
            InkLayer::First => (
                self.background.first_colour,
                self.grid_first_colour_opacity,
                self.grid_first_nudge,
            ),
            InkLayer::Second => (
                self.background.second_colour,
                self.grid_second_colour_opacity,
                self.grid_second_nudge,
            ),
        };
        LayerParams {
            background,
            flipped: self.background.flipped,
            shape_opacity,
            nudge,
        }
    }
}

/// One named step of the draw script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStep {
    /// One `choice` over the palette.
    FirstInk,
    /// `choice` over the palette, repeated until the name differs from the first ink.
    SecondInk,
    /// Two `choice` draws over `[solid, gradient]`: first layer, then second.
    BackgroundTypes,
    /// Five draws: all_one_thing (< 0.2), solid_chance (d * 0.3333 + 0.3333),
    /// all_solid (< 0.2), all_hollow (< 0.2), show_all (< 0.1).
    /// all_solid forces solid_chance to 1, then all_hollow forces it to 0.
    ControlFlags,
    /// One draw, only when all_one_thing: collapse the kinds to a single kind.
    ShapeKinds,
    /// One draw: max_dot_x = floor(d * 4 + 3); max_dot_y = floor(max_dot_x * 1.5).
    GridSize,
    /// Per cell in row-major order: a gate draw; if kept, a kind draw, a fill
    /// draw and, for semicircles only, a rotation draw.
    GridCells,
    /// Per layer: a gate draw (< 0.5), then an index draw into the opacities if open.
    OverlayOpacity,
    /// Per layer: a gate draw (< 0.5), then x and y draws if open.
    Nudges,
    /// Three `bernoulli` draws: first dark (0.33), second dark (0.5), flipped (0.33).
    Backgrounds,
}

impl DrawStep {
    /// The draw script, in execution order.
    pub const ORDER: [DrawStep; 10] = [
        DrawStep::FirstInk,
        DrawStep::SecondInk,
        DrawStep::BackgroundTypes,
        DrawStep::ControlFlags,
        DrawStep::ShapeKinds,
        DrawStep::GridSize,
        DrawStep::GridCells,
        DrawStep::OverlayOpacity,
        DrawStep::Nudges,
        DrawStep::Backgrounds,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DrawStep::FirstInk => "first_ink",
            DrawStep::SecondInk => "second_ink",
            DrawStep::BackgroundTypes => "background_types",
            DrawStep::ControlFlags => "control_flags",
            DrawStep::ShapeKinds => "shape_kinds",
            DrawStep::GridSize => "grid_size",
            DrawStep::GridCells => "grid_cells",
            DrawStep::OverlayOpacity => "overlay_opacity",
            DrawStep::Nudges => "nudges",
            DrawStep::Backgrounds => "backgrounds",
        }
    }
}

/// Derives [`Traits`] from token data using an ink palette.
#[derive(Debug, Clone, Copy)]
pub struct TraitGenerator<'p> {
    palette: &'p InkPalette,
}

impl<'p> TraitGenerator<'p> {
    pub fn new(palette: &'p InkPalette) -> Self {
        Self { palette }
    }

    /// Seeds a fresh generator from `token.hash` and runs the full draw script.
    pub fn generate(&self, token: &TokenData) -> Result<Traits, ArtError> {
        let mut rng = SeededRandom::new(&token.hash);
        self.generate_with(token, &mut rng)
    }

    /// Runs the draw script against a caller-owned generator.
    ///
    /// The generator is left positioned after the last draw of the script.
    pub fn generate_with(
        &self,
        token: &TokenData,
        rng: &mut SeededRandom,
    ) -> Result<Traits, ArtError> {
        let mut draft = Draft::default();
        for step in DrawStep::ORDER {
            draft.apply(step, rng, self.palette)?;
            trace!(step = step.name(), "draw step complete");
        }
        let traits = draft.finish(token, self.palette);
        debug!(
            hash = %token.hash,
            first = %traits.first_colour.name,
            second = %traits.second_colour.name,
            shapes = traits.grid.len(),
            "generated traits"
        );
        Ok(traits)
    }
}

/// Partially built traits, filled in step by step.
#[derive(Debug)]
struct Draft {
    first_ink: usize,
    second_ink: usize,
    first_type: BackgroundType,
    second_type: BackgroundType,
    all_one_thing: bool,
    solid_chance: f64,
    all_solid: bool,
    all_hollow: bool,
    show_all: bool,
    show_dot: f64,
    shape_kinds: Vec<ShapeKind>,
    max_dot_x: usize,
    max_dot_y: usize,
    grid: Vec<GridShape>,
    first_opacity: f64,
    second_opacity: f64,
    first_nudge: Nudge,
    second_nudge: Nudge,
    first_dark: bool,
    second_dark: bool,
    flipped: bool,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            first_ink: 0,
            second_ink: 0,
            first_type: BackgroundType::Solid,
            second_type: BackgroundType::Solid,
            all_one_thing: false,
            solid_chance: 0.0,
            all_solid: false,
            all_hollow: false,
            show_all: false,
            show_dot: 0.25,
            shape_kinds: ShapeKind::ALL.to_vec(),
            max_dot_x: 0,
            max_dot_y: 0,
            grid: Vec::new(),
            first_opacity: 0.0,
            second_opacity: 0.0,
            first_nudge: Nudge::default(),
            second_nudge: Nudge::default(),
            first_dark: false,
            second_dark: false,
            flipped: false,
        }
    }
}

impl Draft {
    fn apply(
        &mut self,
        step: DrawStep,
        rng: &mut SeededRandom,
        palette: &InkPalette,
    ) -> Result<(), ArtError> {
        match step {
            DrawStep::FirstInk => {
                self.first_ink = choose_index(rng, palette.len())?;
            }
            DrawStep::SecondInk => {
                if palette.distinct_names() < 2 {
                    return Err(ArtError::PaletteExhausted { attempts: 0 });
                }
                let inks = palette.inks();
                let first_name = &inks[self.first_ink].name;
                let mut attempts = 0;
                loop {
                    if attempts == MAX_INK_DRAWS {
                        return Err(ArtError::PaletteExhausted { attempts });
                    }
                    attempts += 1;
                    let idx = choose_index(rng, inks.len())?;
                    if inks[idx].name != *first_name {
                        self.second_ink = idx;
                        break;
                    }
                }
            }
            DrawStep::BackgroundTypes => {
                self.first_type = *rng.choice(&BACKGROUND_TYPES)?;
                self.second_type = *rng.choice(&BACKGROUND_TYPES)?;
            }
            DrawStep::ControlFlags => {
                self.all_one_thing = rng.next_f64() < 0.2;
                self.solid_chance = rng.next_f64() * 0.3333 + 0.3333;
                self.all_solid = rng.next_f64() < 0.2;
                self.all_hollow = rng.next_f64() < 0.2;
                if self.all_solid {
                    self.solid_chance = 1.0;
                }
                // Checked second, so hollow wins when both are drawn.
                if self.all_hollow {
                    self.solid_chance = 0.0;
                }
                self.show_all = rng.next_f64() < 0.1;
                if self.show_all {
                    self.show_dot = 1.0;
                }
            }
            DrawStep::ShapeKinds => {
                if self.all_one_thing {
                    let only = self.shape_kinds[rng.index(self.shape_kinds.len())];
                    self.shape_kinds = vec![only];
                }
            }
            DrawStep::GridSize => {
                self.max_dot_x = (rng.next_f64() * 4.0 + 3.0).floor() as usize;
                self.max_dot_y = (self.max_dot_x as f64 * 1.5).floor() as usize;
            }
            DrawStep::GridCells => {
                let cols = self.max_dot_x as f64;
                let rows = self.max_dot_y as f64;
                for row in 0..self.max_dot_y {
                    for col in 0..self.max_dot_x {
                        if rng.next_f64() > self.show_dot {
                            continue;
                        }
                        let kind = self.shape_kinds[rng.index(self.shape_kinds.len())];
                        let filled = rng.next_f64() < self.solid_chance;
                        let rotation_degrees = match kind {
                            ShapeKind::Plus => 45,
                            ShapeKind::Semicircle => rng.index(SEMICIRCLE_ROTATIONS) as u32 * 45,
                            ShapeKind::Circle | ShapeKind::Cross => 0,
                        };
                        self.grid.push(GridShape {
                            x: col as f64 / cols,
                            y: row as f64 / rows,
                            kind,
                            filled,
                            size: 1.0 / cols / 2.0,
                            rotation_degrees,
                        });
                    }
                }
            }
            DrawStep::OverlayOpacity => {
                self.first_opacity = draw_opacity(rng);
                self.second_opacity = draw_opacity(rng);
            }
            DrawStep::Nudges => {
                self.first_nudge = draw_nudge(rng);
                self.second_nudge = draw_nudge(rng);
            }
            DrawStep::Backgrounds => {
                self.first_dark = rng.bernoulli(0.33);
                self.second_dark = rng.bernoulli(0.5);
                self.flipped = rng.bernoulli(0.33);
            }
        }
        Ok(())
    }

    fn finish(self, token: &TokenData, palette: &InkPalette) -> Traits {
        let inks = palette.inks();
        Traits {
            token: token.clone(),
            first_colour: inks[self.first_ink].clone(),
            second_colour: inks[self.second_ink].clone(),
            background: Backgrounds {
                first_colour: BackgroundSpec {
                    kind: self.first_type,
                    dark: self.first_dark,
                },
                second_colour: BackgroundSpec {
                    kind: self.second_type,
                    dark: self.second_dark,
                },
                flipped: self.flipped,
            },
            grid: self.grid,
            grid_first_colour_opacity: self.first_opacity,
            grid_second_colour_opacity: self.second_opacity,
            grid_first_nudge: self.first_nudge,
            grid_second_nudge: self.second_nudge,
            decisions: GridDecisions {
                all_one_thing: self.all_one_thing,
                solid_chance: self.solid_chance,
                all_solid: self.all_solid,
                all_hollow: self.all_hollow,
                show_all: self.show_all,
                shape_kinds: self.shape_kinds,
                max_dot_x: self.max_dot_x,
                max_dot_y: self.max_dot_y,
            },
        }
    }
}

/// `choice` over `0..len`, returning the index.
fn choose_index(rng: &mut SeededRandom, len: usize) -> Result<usize, ArtError> {
    if len == 0 {
        return Err(ArtError::EmptyChoiceSet);
    }
    let idx = rng.uniform_int(0, len as i64 - 1);
    Ok((idx.max(0) as usize).min(len - 1))
}

fn draw_opacity(rng: &mut SeededRandom) -> f64 {
    if rng.next_f64() < 0.5 {
        OVERLAY_OPACITIES[rng.index(OVERLAY_OPACITIES.len())]
    } else {
        0.0
    }
}

fn draw_nudge(rng: &mut SeededRandom) -> Nudge {
    if rng.next_f64() < 0.5 {
        let x = rng.next_f64() - 0.5;
        let y = rng.next_f64() - 0.5;
        Nudge { x, y }
    } else {
        Nudge::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(n: u64) -> String {
        format!("0x{n:064x}")
    }

    fn generate(n: u64) -> Traits {
        let palette = InkPalette::riso();
        TraitGenerator::new(&palette)
            .generate(&TokenData::new(hash(n), 123, 0))
            .unwrap()
    }

    fn cells(traits: &Traits) -> Vec<(usize, usize)> {
        let d = &traits.decisions;
        traits
            .grid
            .iter()
            .map(|s| {
                (
                    (s.x * d.max_dot_x as f64).round() as usize,
                    (s.y * d.max_dot_y as f64).round() as usize,
                )
            })
            .collect()
    }

    // -- Recorded reference traces --

    #[test]
    fn zero_hash_matches_reference_trace() {
        let t = generate(0);
        assert_eq!(t.first_colour.name, "Kelly Green");
        assert_eq!(t.second_colour.name, "Midnight");
        assert_eq!(t.background.first_colour.kind, BackgroundType::Solid);
        assert_eq!(t.background.second_colour.kind, BackgroundType::Solid);

        let d = &t.decisions;
        assert!(!d.all_one_thing);
        assert!(!d.all_solid);
        assert!(!d.all_hollow);
        assert!(!d.show_all);
        assert_eq!(d.solid_chance, 0.513_130_720_780_673_5);
        assert_eq!(d.max_dot_x, 5);
        assert_eq!(d.max_dot_y, 7);

        assert_eq!(cells(&t), vec![(1, 0), (0, 1), (4, 3), (4, 4)]);
        let kinds: Vec<ShapeKind> = t.grid.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ShapeKind::Circle,
                ShapeKind::Cross,
                ShapeKind::Semicircle,
                ShapeKind::Cross
            ]
        );
        let filled: Vec<bool> = t.grid.iter().map(|s| s.filled).collect();
        assert_eq!(filled, vec![true, false, true, true]);
        assert_eq!(t.grid[2].rotation_degrees, 90);
        assert_eq!(t.grid[0].x, 0.2);
        assert_eq!(t.grid[3].y, 0.571_428_571_428_571_4);
        assert!(t.grid.iter().all(|s| s.size == 0.1));

        assert_eq!(t.grid_first_colour_opacity, 0.0);
        assert_eq!(t.grid_second_colour_opacity, 0.0);
        assert_eq!(t.grid_first_nudge, Nudge::default());
        assert_eq!(
            t.grid_second_nudge,
            Nudge {
                x: -0.338_966_493_029_147_4,
                y: 0.322_727_173_799_648_9
            }
        );
        assert!(!t.background.first_colour.dark);
        assert!(t.background.second_colour.dark);
        assert!(!t.background.flipped);
    }

    #[test]
    fn show_all_fills_every_cell() {
        let t = generate(0x05);
        assert_eq!(t.first_colour.name, "Orchid");
        assert_eq!(t.second_colour.name, "Charcoal");
        assert!(t.decisions.show_all);
        assert_eq!(t.grid.len(), 35);
        assert_eq!(t.grid[1].kind, ShapeKind::Plus);
        assert_eq!(t.grid[1].rotation_degrees, 45);
        assert_eq!(t.grid_second_colour_opacity, 0.5);
        assert!(t.background.first_colour.dark);
        assert!(t.background.flipped);
    }

    #[test]
    fn all_hollow_overrides_all_solid() {
        let t = generate(0x11);
        assert!(t.decisions.all_solid);
        assert!(t.decisions.all_hollow);
        assert_eq!(t.decisions.solid_chance, 0.0);
        assert_eq!(t.decisions.max_dot_x, 3);
        assert_eq!(t.decisions.max_dot_y, 4);
        assert_eq!(t.grid.len(), 1);
        assert_eq!(t.grid[0].kind, ShapeKind::Semicircle);
        assert_eq!(t.grid[0].rotation_degrees, 315);
        assert!(t.grid.iter().all(|s| !s.filled));
    }

    #[test]
    fn all_one_thing_collapses_kinds() {
        let t = generate(0x2a);
        assert!(t.decisions.all_one_thing);
        assert_eq!(t.decisions.shape_kinds, vec![ShapeKind::Circle]);
        assert_eq!(t.decisions.max_dot_x, 6);
        assert_eq!(t.grid.len(), 11);
        assert!(t.grid.iter().all(|s| s.kind == ShapeKind::Circle));
        assert_eq!(t.background.second_colour.kind, BackgroundType::Gradient);
    }

    #[test]
    fn gradient_seed_records_nudges_and_opacity() {
        let t = generate(0x0d);
        assert_eq!(t.first_colour.name, "Brown");
        assert_eq!(t.second_colour.name, "Teal");
        assert_eq!(t.background.first_colour.kind, BackgroundType::Gradient);
        assert_eq!(t.background.second_colour.kind, BackgroundType::Gradient);
        assert_eq!(t.grid_first_colour_opacity, 0.5);
        assert_eq!(t.grid_first_nudge.x, 0.239_913_192_810_490_73);
        assert_eq!(t.grid_second_nudge.y, -0.147_878_445_219_248_53);
        assert!(t.background.flipped);
    }

    // -- Draw script --

    #[test]
    fn draw_order_is_fixed() {
        let names: Vec<&str> = DrawStep::ORDER.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "first_ink",
                "second_ink",
                "background_types",
                "control_flags",
                "shape_kinds",
                "grid_size",
                "grid_cells",
                "overlay_opacity",
                "nudges",
                "backgrounds",
            ]
        );
    }

    #[test]
    fn generate_with_leaves_rng_after_last_draw() {
        let palette = InkPalette::riso();
        let token = TokenData::new(hash(0), 1, 0);
        let mut rng = SeededRandom::new(&token.hash);
        TraitGenerator::new(&palette)
            .generate_with(&token, &mut rng)
            .unwrap();

        // Zero hash: 2 inks, 2 types, 5 flags, 1 size, 35 gates,
        // 4 shapes * 2 + 1 semicircle rotation, 2 opacity gates,
        // 2 nudge gates + 2 nudge draws, 3 background flags.
        let mut expected = SeededRandom::new(&token.hash);
        for _ in 0..(2 + 2 + 5 + 1 + 35 + 9 + 2 + 4 + 3) {
            expected.next_u32();
        }
        assert_eq!(rng, expected);
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate(0xbeef), generate(0xbeef));
    }

    #[test]
    fn layer_params_select_matching_fields() {
        let t = generate(0x0d);
        let first = t.layer_params(InkLayer::First);
        assert_eq!(first.background, t.background.first_colour);
        assert_eq!(first.shape_opacity, 0.5);
        assert_eq!(first.nudge, t.grid_first_nudge);
        assert!(first.flipped);
        let second = t.layer_params(InkLayer::Second);
        assert_eq!(second.background, t.background.second_colour);
        assert_eq!(second.nudge, t.grid_second_nudge);
        assert_eq!(t.ink(InkLayer::Second).name, "Teal");
    }

    // -- Palette failures --

    #[test]
    fn single_ink_palette_is_exhausted() {
        let palette = InkPalette::new(vec![Ink::new("Black", 0, 0, 0)]).unwrap();
        let result = TraitGenerator::new(&palette).generate(&TokenData::new(hash(0), 1, 0));
        assert!(matches!(result, Err(ArtError::PaletteExhausted { .. })));
    }

    #[test]
    fn duplicate_names_only_palette_is_exhausted() {
        let palette = InkPalette::new(vec![
            Ink::new("Black", 0, 0, 0),
            Ink::new("Black", 10, 10, 10),
        ])
        .unwrap();
        let result = TraitGenerator::new(&palette).generate(&TokenData::new(hash(3), 1, 0));
        assert!(matches!(result, Err(ArtError::PaletteExhausted { .. })));
    }

    #[test]
    fn two_ink_palette_always_yields_both() {
        let palette =
            InkPalette::new(vec![Ink::new("Red", 255, 0, 0), Ink::new("Blue", 0, 0, 255)])
                .unwrap();
        for n in 0..50 {
            let t = TraitGenerator::new(&palette)
                .generate(&TokenData::new(hash(n), 1, 0))
                .unwrap();
            assert_ne!(t.first_colour.name, t.second_colour.name);
        }
    }

    #[test]
    fn empty_seed_still_generates() {
        let palette = InkPalette::riso();
        let t = TraitGenerator::new(&palette)
            .generate(&TokenData::new("", 1, 0))
            .unwrap();
        assert_ne!(t.first_colour.name, t.second_colour.name);
    }

    #[test]
    fn traits_serialize_with_type_keys() {
        let v = serde_json::to_value(generate(0)).unwrap();
        assert_eq!(v["background"]["first_colour"]["type"], "solid");
        assert_eq!(v["first_colour"]["name"], "Kelly Green");
        assert_eq!(v["grid"][0]["kind"], "circle");
        let back: Traits = serde_json::from_value(v).unwrap();
        assert_eq!(back, generate(0));
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn invariants_hold_for_any_seed(seed in "(0x[0-9a-f]{64})|(.{0,40})") {
                let palette = InkPalette::riso();
                let t = TraitGenerator::new(&palette)
                    .generate(&TokenData::new(seed, 1, 0))
                    .unwrap();
                let d = &t.decisions;

                prop_assert_ne!(&t.first_colour.name, &t.second_colour.name);
                prop_assert!((3..=6).contains(&d.max_dot_x));
                prop_assert_eq!(d.max_dot_y, (d.max_dot_x as f64 * 1.5).floor() as usize);
                prop_assert!(t.grid.len() <= d.max_dot_x * d.max_dot_y);
                if d.show_all {
                    prop_assert_eq!(t.grid.len(), d.max_dot_x * d.max_dot_y);
                }
                prop_assert!([0.0, 0.2, 0.5].contains(&t.grid_first_colour_opacity));
                prop_assert!([0.0, 0.2, 0.5].contains(&t.grid_second_colour_opacity));
                for n in [t.grid_first_nudge, t.grid_second_nudge] {
                    prop_assert!((-0.5..0.5).contains(&n.x) && (-0.5..0.5).contains(&n.y));
                }

                let mut last = None;
                for s in &t.grid {
                    prop_assert_eq!(s.size, 1.0 / (2.0 * d.max_dot_x as f64));
                    prop_assert!((0.0..1.0).contains(&s.x) && (0.0..1.0).contains(&s.y));
                    prop_assert!(d.shape_kinds.contains(&s.kind));
                    match s.kind {
                        ShapeKind::Plus => prop_assert_eq!(s.rotation_degrees, 45),
                        ShapeKind::Semicircle => {
                            prop_assert!(s.rotation_degrees % 45 == 0 && s.rotation_degrees <= 315)
                        }
                        _ => prop_assert_eq!(s.rotation_degrees, 0),
                    }
                    // Row-major scan order.
                    let key = (s.y, s.x);
                    if let Some(prev) = last {
                        prop_assert!(key > prev);
                    }
                    last = Some(key);
                }
                if d.all_hollow {
                    prop_assert!(t.grid.iter().all(|s| !s.filled));
                } else if d.all_solid {
                    prop_assert!(t.grid.iter().all(|s| s.filled));
                }
            }
        }
    }
}
