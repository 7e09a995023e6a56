//! Seek and step requests sent to the audio sink.

use gstreamer as gst;

use crate::rate::PlaybackRate;

/// Where a seek segment stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekStop {
    /// Play through to the end of the stream.
    EndOfStream,
    /// Stop at an absolute stream time.
    At(gst::ClockTime),
}

/// A flushing, accurate seek that re-renders the stream at `rate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeekRequest {
    pub rate: PlaybackRate,
    pub start: gst::ClockTime,
    pub stop: SeekStop,
}

impl SeekRequest {
    /// Build the segment for `rate` around the current `position`.
    ///
    /// Forward playback runs from `position` to the end of the stream; reverse
    /// playback runs from the start of the stream back from `position`.
    pub fn for_rate(rate: PlaybackRate, position: gst::ClockTime) -> Self {
        if rate.is_forward() {
            Self {
                rate,
                start: position,
                stop: SeekStop::EndOfStream,
            }
        } else {
            Self {
                rate,
                start: gst::ClockTime::ZERO,
                stop: SeekStop::At(position),
            }
        }
    }

    pub fn to_event(&self) -> gst::Event {
        let flags = gst::SeekFlags::FLUSH | gst::SeekFlags::ACCURATE;
        let (stop_type, stop) = match self.stop {
            SeekStop::EndOfStream => (gst::SeekType::End, gst::ClockTime::ZERO),
            SeekStop::At(position) => (gst::SeekType::Set, position),
        };
        gst::event::Seek::new(
            self.rate.value(),
            flags,
            gst::SeekType::Set,
            self.start,
            stop_type,
            stop,
        )
    }
}

/// Advance by a number of buffers at the current speed, without changing direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepRequest {
    pub buffers: u64,
    pub rate: f64,
}

impl StepRequest {
    /// A single-frame step; the direction comes from the active segment.
    pub fn one_frame(rate: PlaybackRate) -> Self {
        Self {
            buffers: 1,
            rate: rate.magnitude(),
        }
    }

    pub fn to_event(&self) -> gst::Event {
        gst::event::Step::new(
            gst::format::Buffers::from_u64(self.buffers),
            self.rate,
            true,
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_seek_runs_from_position_to_end() {
        let position = gst::ClockTime::from_seconds(7);
        let req = SeekRequest::for_rate(PlaybackRate::forward(20.0), position);
        assert_eq!(req.start, position);
        assert_eq!(req.stop, SeekStop::EndOfStream);
    }

    #[test]
    fn reverse_seek_runs_from_start_to_position() {
        let position = gst::ClockTime::from_seconds(7);
        let req = SeekRequest::for_rate(PlaybackRate::forward(4.0).reversed(), position);
        assert_eq!(req.start, gst::ClockTime::ZERO);
        assert_eq!(req.stop, SeekStop::At(position));
        assert_eq!(req.rate.value(), -4.0);
    }

    #[test]
    fn step_uses_rate_magnitude() {
        let step = StepRequest::one_frame(PlaybackRate::forward(20.0).reversed());
        assert_eq!(step.buffers, 1);
        assert_eq!(step.rate, 20.0);
    }

    #[test]
    fn reverse_seek_event_carries_bounded_range() {
        gst::init().expect("init gstreamer");
        let position = gst::ClockTime::from_mseconds(1500);
        let event =
            SeekRequest::for_rate(PlaybackRate::forward(4.0).reversed(), position).to_event();

        let gst::EventView::Seek(seek) = event.view() else {
            panic!("expected a seek event");
        };
        let (rate, flags, start_type, start, stop_type, stop) = seek.get();
        assert_eq!(rate, -4.0);
        assert!(flags.contains(gst::SeekFlags::FLUSH | gst::SeekFlags::ACCURATE));
        assert_eq!(start_type, gst::SeekType::Set);
        assert_eq!(start, gst::GenericFormattedValue::from(gst::ClockTime::ZERO));
        assert_eq!(stop_type, gst::SeekType::Set);
        assert_eq!(stop, gst::GenericFormattedValue::from(position));
    }

    #[test]
    fn forward_seek_event_stops_at_end() {
        gst::init().expect("init gstreamer");
        let position = gst::ClockTime::from_seconds(3);
        let event = SeekRequest::for_rate(PlaybackRate::forward(20.0), position).to_event();

        let gst::EventView::Seek(seek) = event.view() else {
            panic!("expected a seek event");
        };
        let (rate, _flags, start_type, start, stop_type, _stop) = seek.get();
        assert_eq!(rate, 20.0);
        assert_eq!(start_type, gst::SeekType::Set);
        assert_eq!(start, gst::GenericFormattedValue::from(position));
        assert_eq!(stop_type, gst::SeekType::End);
    }
}
