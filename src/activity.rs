//! Activity assembly
//!
//! Builds the activity variant matching the sessions of a file:
//!
//! - several sessions: multisport, one sub-activity per session in decoder
//!   order, records and laps partitioned by session window
//! - one distance session: speed, cadence and altitude statistics plus laps
//!   and the record track
//! - one climbing session: one climb per split
//! - one strength session: one set per set message
//!
//! Enhanced fields win over their legacy counterparts unless absent or zero.

use crate::error::ParseError;
use crate::pools::MessagePools;
use crate::schema::{
    FileIdMessage, LapMessage, RecordMessage, SessionMessage, SetMessage, SplitMessage,
    WorkoutMessage, WorkoutStepMessage,
};
use crate::sport::{self, Category, TRANSITION_SPORT};
use crate::types::*;
use crate::window;

/// Display name of transition legs
pub const TRANSITION_NAME: &str = "Transition";

/// Enhanced value unless it is absent or zero, else the legacy one
pub fn prefer<T: Copy + Default + PartialEq>(enhanced: Option<T>, legacy: Option<T>) -> Option<T> {
    match enhanced {
        Some(value) if value != T::default() => Some(value),
        _ => legacy,
    }
}

/// Assemble the activity described by validated activity pools
pub fn assemble(pools: &MessagePools) -> Result<Activity, ParseError> {
    sport::check_sessions(&pools.sessions)?;
    let device = pools.file_ids.first().map(device);

    if pools.sessions.len() > 1 {
        return Ok(Activity::Multisport(multisport(
            &pools.sessions,
            &pools.records,
            &pools.laps,
            device,
        )));
    }

    let session = &pools.sessions[0];
    let mut summary = summary(session, workout(pools.workouts.first(), &pools.workout_steps));
    summary.device = device;

    match sport::classify(&session.sport) {
        Some(Category::Distance) => {
            let records: Vec<&RecordMessage> = pools.records.iter().collect();
            let laps: Vec<&LapMessage> = pools.laps.iter().collect();
            Ok(Activity::Distance(distance(summary, session, &records, &laps)))
        }
        Some(Category::Climbing) => Ok(Activity::Climb(ClimbActivity {
            summary,
            climbs: pools.splits.iter().map(climb).collect(),
        })),
        Some(Category::Set) => Ok(Activity::Set(SetActivity {
            summary,
            sets: pools.sets.iter().map(strength_set).collect(),
        })),
        // A lone transition session is not an activity of its own
        Some(Category::Multisport) | None => Err(sport::unsupported(session)),
    }
}

fn multisport(
    sessions: &[SessionMessage],
    records: &[RecordMessage],
    laps: &[LapMessage],
    device: Option<Device>,
) -> MultisportActivity {
    let activities = sessions
        .iter()
        .map(|session| {
            if session.sport == TRANSITION_SPORT {
                let mut summary = summary(session, None);
                summary.name = TRANSITION_NAME.to_string();
                Activity::Transition(summary)
            } else if sport::classify(&session.sport) == Some(Category::Distance) {
                let (records, laps) = window::filter(session, records, laps);
                Activity::Distance(distance(summary(session, None), session, &records, &laps))
            } else {
                Activity::Generic(summary(session, None))
            }
        })
        .collect();

    MultisportActivity { device, activities }
}

fn device(file_id: &FileIdMessage) -> Device {
    Device {
        manufacturer: file_id.manufacturer.clone(),
        product: file_id.product,
        garmin_product: file_id.garmin_product.clone(),
        serial_number: file_id.serial_number,
        time_created: file_id.time_created,
    }
}

fn summary(session: &SessionMessage, workout: Option<Workout>) -> ActivitySummary {
    ActivitySummary {
        name: session.sport.clone(),
        sport: session.sport.clone(),
        sub_sport: session.sub_sport.clone(),
        sport_profile_name: session.sport_profile_name.clone(),
        time: TimeStat {
            timestamp: Some(session.timestamp),
            start_time: Some(session.start_time),
            elapsed: Some(session.total_elapsed_time),
            timer: Some(session.total_timer_time),
        },
        hr: MaxAvg {
            max: session.max_heart_rate,
            avg: session.avg_heart_rate,
        },
        temperature: MaxMinAvg {
            max: session.max_temperature,
            min: session.min_temperature,
            avg: session.avg_temperature,
        },
        total_calories: session.total_calories,
        total_cycles: session.total_cycles,
        first_lap_index: session.first_lap_index,
        num_laps: session.num_laps,
        training_effect: TrainingEffect {
            aerobic: session.total_training_effect,
            anaerobic: session.total_anaerobic_training_effect,
            load_peak: session.training_load_peak,
        },
        device: None,
        workout,
    }
}

fn distance(
    summary: ActivitySummary,
    session: &SessionMessage,
    records: &[&RecordMessage],
    laps: &[&LapMessage],
) -> DistanceActivity {
    let altitudes = records
        .iter()
        .filter_map(|r| prefer(r.enhanced_altitude, r.altitude));
    let (min, max) = altitudes.fold((None, None), |(min, max): (Option<f64>, Option<f64>), a| {
        (
            Some(min.map_or(a, |m| m.min(a))),
            Some(max.map_or(a, |m| m.max(a))),
        )
    });

    DistanceActivity {
        summary,
        total_distance: session.total_distance,
        speed: MaxAvg {
            max: prefer(session.enhanced_max_speed, session.max_speed),
            avg: prefer(session.enhanced_avg_speed, session.avg_speed),
        },
        cadence: MaxAvg {
            max: prefer(session.max_cadence, session.max_running_cadence),
            avg: prefer(session.avg_cadence, session.avg_running_cadence),
        },
        altitude: AltitudeStat {
            max,
            min,
            gain: session.total_ascent,
            loss: session.total_descent,
        },
        total_strides: session.total_strides,
        start_location: Location {
            lat: session.start_position_lat,
            lon: session.start_position_long,
        },
        end_location: Location {
            lat: session.end_position_lat,
            lon: session.end_position_long,
        },
        laps: laps.iter().map(|l| lap(l)).collect(),
        records: records.iter().map(|r| track_point(r)).collect(),
    }
}

fn lap(lap: &LapMessage) -> Lap {
    Lap {
        message_index: lap.message_index,
        timestamp: lap.timestamp,
        time: TimeStat {
            timestamp: Some(lap.timestamp),
            start_time: lap.start_time,
            elapsed: lap.total_elapsed_time,
            timer: lap.total_timer_time,
        },
        total_distance: lap.total_distance,
        speed: MaxAvg {
            max: prefer(lap.enhanced_max_speed, lap.max_speed),
            avg: prefer(lap.enhanced_avg_speed, lap.avg_speed),
        },
        hr: MaxAvg {
            max: lap.max_heart_rate,
            avg: lap.avg_heart_rate,
        },
        altitude: AltitudeStat {
            max: prefer(lap.enhanced_max_altitude, lap.max_altitude),
            min: prefer(lap.enhanced_min_altitude, lap.min_altitude),
            gain: lap.total_ascent,
            loss: lap.total_descent,
        },
        total_calories: lap.total_calories,
        cadence: MaxAvg {
            max: prefer(lap.max_cadence, lap.max_running_cadence),
            avg: prefer(lap.avg_cadence, lap.avg_running_cadence),
        },
        total_strides: prefer(lap.total_strides, lap.total_strokes),
        start_location: Location {
            lat: lap.start_position_lat,
            lon: lap.start_position_long,
        },
        end_location: Location {
            lat: lap.end_position_lat,
            lon: lap.end_position_long,
        },
    }
}

fn track_point(record: &RecordMessage) -> TrackPoint {
    TrackPoint {
        timestamp: record.timestamp,
        location: Location {
            lat: record.position_lat,
            lon: record.position_long,
        },
        altitude: prefer(record.enhanced_altitude, record.altitude),
        distance: prefer(record.enhanced_distance, record.distance),
        speed: prefer(record.enhanced_speed, record.speed),
        heart_rate: record.heart_rate,
        cadence: record.cadence,
        power: record.power,
        temperature: record.temperature,
    }
}

fn climb(split: &SplitMessage) -> Climb {
    Climb {
        time: TimeStat {
            timestamp: Some(split.start_time),
            start_time: Some(split.start_time),
            elapsed: Some(split.total_elapsed_time),
            timer: Some(split.total_timer_time),
        },
        split_type: SplitType::from_name(&split.split_type),
        hr: MaxAvg {
            max: split.max_hr.map(|hr| hr as f64),
            avg: split.avg_hr.map(|hr| hr as f64),
        },
        total_calories: split.total_calories,
        difficulty: split.difficulty,
        result: ClimbResult::from_code(split.result),
    }
}

fn strength_set(set: &SetMessage) -> StrengthSet {
    StrengthSet {
        order: set.message_index,
        exercise: set.category.first().cloned().or_else(|| set.set_type.clone()),
        time: TimeStat {
            timestamp: Some(set.timestamp),
            start_time: set.start_time,
            elapsed: set.duration,
            timer: set.duration,
        },
        repetitions: set.repetitions,
        weight: set.weight,
        weight_unit: set.weight_display_unit.clone(),
    }
}

fn workout(workout: Option<&WorkoutMessage>, steps: &[WorkoutStepMessage]) -> Option<Workout> {
    let workout = workout?;
    let mut steps: Vec<WorkoutStep> = steps
        .iter()
        .map(|step| WorkoutStep {
            message_index: step.message_index,
            name: step.wkt_step_name.clone(),
            duration_type: step.duration_type.clone(),
            duration_value: step.duration_value,
            duration_time: step.duration_time,
            duration_distance: step.duration_distance,
            duration_reps: step.duration_reps,
            repeat_steps: step.repeat_steps,
            target_type: step.target_type.clone(),
            target_value: step.target_value,
            intensity: step.intensity.clone(),
            notes: step.notes.clone(),
            exercise_category: step.exercise_category.clone(),
            exercise_weight: step.exercise_weight,
        })
        .collect();
    steps.sort_by_key(|step| step.message_index);

    Some(Workout {
        name: workout.wkt_name.clone(),
        sport: workout.sport.clone(),
        steps,
    })
}
