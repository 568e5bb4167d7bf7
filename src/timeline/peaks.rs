/// Amplitude extrema for one channel, one entry per display pixel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelPeaks {
    pub min_peaks: Vec<f32>,
    pub max_peaks: Vec<f32>,
}

/// Externally computed peak data, stored for the renderer and never
/// interpreted by scheduling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Peaks {
    channels: Vec<ChannelPeaks>,
}

impl Peaks {
    pub fn new(channels: Vec<ChannelPeaks>) -> Self {
        Self { channels }
    }

    pub fn channels(&self) -> &[ChannelPeaks] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Option<&ChannelPeaks> {
        self.channels.get(index)
    }

    /// Number of peak entries, taken from the first channel
    pub fn len(&self) -> usize {
        self.channels
            .first()
            .map_or(0, |channel| channel.min_peaks.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
