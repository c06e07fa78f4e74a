use std::io::Cursor;
use std::time::Duration;

use rodio::{source::SineWave, OutputStream, Sink, Source};

use crate::effect::Sound;

pub fn play_ogg(bytes: Vec<u8>) -> Result<(), String> {
    let cursor = Cursor::new(bytes);
    let (_stream, handle) = OutputStream::try_default().map_err(|err| err.to_string())?;
    let sink = Sink::try_new(&handle).map_err(|err| err.to_string())?;
    let source = rodio::Decoder::new(cursor).map_err(|err| err.to_string())?;
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

/// (frequency, millis) notes for each cue.
fn notes(sound: Sound) -> &'static [(f32, u64)] {
    match sound {
        Sound::Select => &[(880.0, 60)],
        Sound::Error => &[(220.0, 90), (180.0, 120)],
        Sound::Sparkle => &[(1318.5, 60), (1760.0, 60), (2093.0, 90)],
    }
}

/// Plays a cue on a detached thread; missing audio devices are ignored.
pub fn play_sound(sound: Sound) {
    std::thread::spawn(move || {
        let Ok((stream, handle)) = OutputStream::try_default() else {
            return;
        };
        let Ok(sink) = Sink::try_new(&handle) else {
            return;
        };
        for &(frequency, millis) in notes(sound) {
            let source = SineWave::new(frequency)
                .take_duration(Duration::from_millis(millis))
                .amplify(0.18);
            sink.append(source);
        }
        sink.sleep_until_end();
        drop(stream);
    });
}
