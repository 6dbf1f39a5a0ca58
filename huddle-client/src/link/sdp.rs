/// Opus target bitrate written into every description, in bits/s.
pub const OPUS_MAX_AVERAGE_BITRATE: u32 = 128_000;

const OPUS_FMTP: &str = "a=fmtp:111 ";

/// Rewrites a description so the Opus payload carries the call's fixed
/// audio profile: 128 kbps average, stereo both ways.
pub fn prefer_opus(sdp: &str) -> String {
    sdp.replace(
        OPUS_FMTP,
        &format!("a=fmtp:111 maxaveragebitrate={OPUS_MAX_AVERAGE_BITRATE};stereo=1;sprop-stereo=1;"),
    )
}
