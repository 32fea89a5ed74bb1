//! Static text shown alongside the computed sections.

pub const HOME: &str = "\
Cafe Sales Analysis Dashboard

What this dashboard covers:

  1. Event Impact        How sales respond to events and holidays.
  2. Temperature Effect  Correlation between temperature and daily sales.
  3. Category Performance  Sales and trends for each product category.
  4. Discount Analysis   How discount depth affects quantity sold.
  5. Model Development   Summary of the offline forecasting experiments.

Run a subcommand (events, temperature, categories, discounts, model, conclusion)
to open a section, or `all` to print every section.";

pub const EVENTS_CONCLUSION: &str = "\
Conclusion & Recommendations
- Only long weekends lift sales clearly above an ordinary day.
- Other events show no uplift; their sales sit at or below the non-event average.
- Plan inventory, promotions and staffing around long weekends.
- Keep tracking event days, but let the measured results drive event planning.";

pub const TEMPERATURE_CONCLUSION: &str = "\
Conclusion & Recommendations
- A correlation close to zero means temperature does not drive overall sales volume.
- Product-level correlations are all weak; no item is strongly weather sensitive.
- Do not adjust inventory, promotions or staffing on weather forecasts.
- Keep recording temperature so a future relationship can still be detected.";

pub const CATEGORY_TAKEAWAYS: &str = "\
Key Takeaways
- Coffee is the top seller by both revenue and units.
- Pastries, tea and sandwiches are smaller but still important.
- Sandwiches carry the highest revenue per item; coffee dominates volume.
- Monthly trends are stable with small seasonal shifts.";

pub const DISCOUNT_CONCLUSION: &str = "\
Conclusion & Recommendations
- Most discounts are under 10%, with a sharp drop-off above that.
- Quantity sold peaks in the Moderate (5–10%) bin across every category.
- Deeper discounts do not move more product and only cost margin.
- Use moderate discounts by default; push Coffee or Pastries first if one line needs a boost.";

pub const MODEL_DEVELOPMENT: &str = "\
Model Development Summary
- Linear Regression, Random Forest, XGBoost and Prophet were tried for daily sales forecasting.
- Prophet with calendar regressors had the lowest MAE and RMSE.
- Random Forest and XGBoost were competitive but did not beat Prophet.
- Training and tuning are too slow for an interactive dashboard, so they run offline
  and only the results are summarized here.

Bottom line: Prophet is the best forecasting option for this dataset for now.";

pub const FINAL_RECOMMENDATIONS: &str = "\
Final Recommendations

Events
- Long weekends are the only events with a consistent sales lift. Staff and stock for them.
- Other events have no proven impact; do not spend extra resources on them.

Temperature
- Daily sales are not meaningfully affected by temperature.

Category Performance
- Coffee is the main revenue driver. Use it to bundle pastries and sandwiches.
- Tea can run occasional promotions without large expectations.

Discounts
- The sweet spot is 5–10%. Steeper discounts hurt margin without adding volume.

Sales Forecasting
- Use Prophet for planning and retrain it periodically outside the dashboard.

Bottom line: focus on long weekends, moderate discounts and coffee.";
