use crate::weather::weather_readout;
use crate::AppState;

pub async fn get_weather_readout(state: &AppState) -> String {
    weather_readout(state.weather.as_ref(), &state.config.weather).await
}
