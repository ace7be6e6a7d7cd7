// src/blend/compositor.rs
//
// Deferred pigment mixing. Brushes that blend stamp alpha into one of two
// channel masks; the compositor only runs a mixing pass when the pigment
// (or watercolor mode) of a channel changes, or when a flush is forced.
// Brushes that do not blend draw colored stamps into the pass-through mask,
// which is pasted ahead of every mixing pass.

use crate::render::{Canvas, MixUniforms, Raster, RasterError};
use crate::utilities::Rand;

/// Blend channels. Shape brushes and fills mix through the vector mask,
/// image tips through the image mask, so neither forces the other to flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Vector,
    Image,
}

impl Channel {
    fn slot(self) -> usize {
        match self {
            Channel::Vector => 0,
            Channel::Image => 1,
        }
    }
}

/// Which mask a stamp is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskTarget {
    Blended(Channel),
    PassThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlendState {
    pub pending: bool,
    pub pigment: [f32; 3],
    pub watercolor: bool,
}

pub struct Compositor {
    masks: [Raster; 2],
    pass_through: Raster,
    states: [BlendState; 2],
    caching: bool,
}

impl Compositor {
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        Ok(Self {
            masks: [Raster::new(width, height)?, Raster::new(width, height)?],
            pass_through: Raster::new(width, height)?,
            states: [BlendState::default(); 2],
            caching: true,
        })
    }

    pub fn state(&self, channel: Channel) -> BlendState {
        self.states[channel.slot()]
    }

    /// With caching off every blend call flushes, which costs more passes
    /// but avoids flat patches when one color is reused many times.
    pub fn set_caching(&mut self, caching: bool) {
        self.caching = caching;
    }

    pub fn mask(&self, target: MaskTarget) -> &Raster {
        match target {
            MaskTarget::Blended(channel) => &self.masks[channel.slot()],
            MaskTarget::PassThrough => &self.pass_through,
        }
    }

    pub fn mask_mut(&mut self, target: MaskTarget) -> &mut Raster {
        match target {
            MaskTarget::Blended(channel) => &mut self.masks[channel.slot()],
            MaskTarget::PassThrough => &mut self.pass_through,
        }
    }

    /// Copies the non-blended stamps onto the canvas and clears them.
    pub fn redraw<C: Canvas>(&mut self, canvas: &mut C) {
        if !self.pass_through.is_blank() {
            canvas.paste(&self.pass_through);
            self.pass_through.clear();
        }
    }

    /// Registers `pigment` for the next stamps on `channel`, flushing the
    /// stamps accumulated under the previous pigment when it changes.
    /// `force` is the final flush of a batch: it mixes whatever is pending
    /// and leaves the channel idle.
    pub fn blend<C: Canvas>(
        &mut self,
        canvas: &mut C,
        rand: &mut Rand,
        pigment: Option<[f32; 3]>,
        force: bool,
        channel: Channel,
        watercolor: bool,
    ) {
        let slot = channel.slot();
        let mut state = self.states[slot];

        if !state.pending {
            match pigment {
                Some(p) => {
                    state = BlendState {
                        pending: true,
                        pigment: p,
                        watercolor,
                    };
                }
                None => {
                    if force && channel == Channel::Vector {
                        self.redraw(canvas);
                    }
                    return;
                }
            }
        }

        let (incoming, incoming_watercolor) = match pigment {
            Some(p) => (p, watercolor),
            None => (state.pigment, state.watercolor),
        };
        let changed = incoming != state.pigment || incoming_watercolor != state.watercolor;

        if changed || force || !self.caching {
            self.redraw(canvas);
            let uniforms = MixUniforms {
                pigment: state.pigment,
                watercolor: state.watercolor,
                random: [rand.unit(), rand.unit(), rand.unit()],
            };
            let mask = &mut self.masks[slot];
            if !mask.is_blank() {
                log::trace!("mixing {:?} channel with {:?}", channel, state.pigment);
                canvas.mix(mask, &uniforms);
                mask.clear();
            }
            if !force {
                state.pigment = incoming;
                state.watercolor = incoming_watercolor;
            }
        }

        if force {
            state.pending = false;
        }
        self.states[slot] = state;
    }

    /// Forced flush of both channels, to be called at the end of every
    /// drawing batch so the last pigment is never left unmixed.
    pub fn flush_all<C: Canvas>(&mut self, canvas: &mut C, rand: &mut Rand) {
        self.blend(canvas, rand, None, true, Channel::Vector, false);
        self.blend(canvas, rand, None, true, Channel::Image, false);
        self.redraw(canvas);
    }
}
