//! Buzzer playback task
//!
//! Plays decoded tone sequences on a piezo buzzer via PWM. Each tone is a
//! 50% duty square wave at the requested frequency; frequency 0 is a
//! timed rest. A new sound request replaces the running one between tones.

use defmt::*;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::Timer;

use omma_protocol::Tone;

use crate::channels::SOUND_JOBS;

/// PWM divider bringing the 125 MHz system clock to a 1 MHz tick
const PWM_DIVIDER: u8 = 125;

/// Counter tick rate after division
const TICK_HZ: u32 = 1_000_000;

/// Lowest frequency the 16-bit counter can produce at that tick rate
const MIN_FREQ_HZ: u16 = 16;

/// Sound task - plays tone sequences on the buzzer
#[embassy_executor::task]
pub async fn sound_task(mut pwm: Pwm<'static>) {
    info!("Sound task started");

    silence(&mut pwm);

    let mut job = SOUND_JOBS.receive().await;
    loop {
        debug!("Sound request: {} tones", job.len());

        let mut preempted = None;
        for tone in &job {
            play_tone(&mut pwm, tone).await;

            if let Ok(next) = SOUND_JOBS.try_receive() {
                debug!("Sound preempted");
                preempted = Some(next);
                break;
            }
        }
        silence(&mut pwm);

        job = match preempted {
            Some(next) => next,
            None => SOUND_JOBS.receive().await,
        };
    }
}

/// Sound one tone (or rest) for its duration
async fn play_tone(pwm: &mut Pwm<'static>, tone: &Tone) {
    if tone.is_rest() || tone.freq_hz < MIN_FREQ_HZ {
        silence(pwm);
    } else {
        let top = (TICK_HZ / tone.freq_hz as u32) as u16;
        let mut config = PwmConfig::default();
        config.divider = PWM_DIVIDER.into();
        config.top = top;
        config.compare_a = top / 2; // Square wave, 50% duty
        pwm.set_config(&config);
    }

    Timer::after_millis(tone.duration_ms as u64).await;
}

/// Stop the buzzer output
fn silence(pwm: &mut Pwm<'static>) {
    let mut config = PwmConfig::default();
    config.divider = PWM_DIVIDER.into();
    config.compare_a = 0; // 0% duty
    pwm.set_config(&config);
}
